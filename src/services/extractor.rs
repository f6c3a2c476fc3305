//! Answer extraction strategies.
//!
//! Two interchangeable implementations of the `AnswerExtractor` port:
//! a deterministic pass-through used for reproducible testing, and the
//! generation-backed strategy used in production.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::QueryResult;
use crate::domain::models::{ExtractionMode, ScoredChunk};
use crate::domain::ports::{AnswerExtractor, Extraction};
use crate::infrastructure::backend::OllamaClient;

/// Standardized answer label when the context does not contain the
/// answer, and the sentinel the generation prompt asks the model to emit.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Separator between passages when building extraction context.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Deterministic extraction: concatenates retrieved passages verbatim.
///
/// Passages with cosine distance above `not_found_distance` do not count
/// as evidence; with no passage under the threshold the query reports
/// `found = false`. No external call is made, so repeated queries yield
/// byte-identical answers.
pub struct MockExtractor {
    not_found_distance: f32,
}

impl MockExtractor {
    pub fn new(not_found_distance: f32) -> Self {
        Self { not_found_distance }
    }
}

#[async_trait]
impl AnswerExtractor for MockExtractor {
    fn mode(&self) -> ExtractionMode {
        ExtractionMode::Mock
    }

    async fn extract(&self, _query: &str, retrieved: &[ScoredChunk]) -> QueryResult<Extraction> {
        let relevant: Vec<&ScoredChunk> = retrieved
            .iter()
            .filter(|r| r.score <= self.not_found_distance)
            .collect();

        if relevant.is_empty() {
            return Ok(Extraction {
                answer: NOT_FOUND.to_string(),
                found: false,
            });
        }

        let answer = relevant
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        Ok(Extraction {
            answer,
            found: true,
        })
    }

    async fn check_backend(&self) -> QueryResult<()> {
        Ok(())
    }
}

/// Production extraction through the generation backend.
///
/// Builds a strict extraction prompt around the retrieved context and
/// parses the model output for the not-found sentinel. Sentinel
/// detection is substring matching against free-form model prose: a
/// best-effort heuristic, so mismatches are logged for prompt tuning
/// rather than treated as errors.
pub struct GenerationExtractor {
    client: Arc<OllamaClient>,
}

impl GenerationExtractor {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    fn build_prompt(query: &str, context: &str) -> String {
        format!(
            r#"You are an information extraction system.

Rules:
- Use ONLY the provided context.
- Return ONLY the extracted answer value.
- Copy the answer EXACTLY as it appears in the context (verbatim). Do not rephrase. Do not correct spelling.
- Do not add any extra words, labels, punctuation, or explanations.
- If the answer is not explicitly present in the context, return exactly: {NOT_FOUND}

Context:
{context}

Question: {query}

Extracted value:"#
        )
    }

    /// Trim, and strip one pair of symmetric surrounding double quotes
    /// the model sometimes adds.
    fn normalize(raw: &str) -> String {
        let trimmed = raw.trim();
        match trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            Some(inner) => inner.trim().to_string(),
            None => trimmed.to_string(),
        }
    }
}

#[async_trait]
impl AnswerExtractor for GenerationExtractor {
    fn mode(&self) -> ExtractionMode {
        ExtractionMode::Production
    }

    async fn extract(&self, query: &str, retrieved: &[ScoredChunk]) -> QueryResult<Extraction> {
        if retrieved.is_empty() {
            tracing::debug!("No passages retrieved, skipping generation call");
            return Ok(Extraction {
                answer: NOT_FOUND.to_string(),
                found: false,
            });
        }

        let context = retrieved
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let prompt = Self::build_prompt(query, &context);
        let raw = self.client.generate(&prompt).await?;
        let answer = Self::normalize(&raw);

        if answer.contains(NOT_FOUND) {
            if answer != NOT_FOUND {
                tracing::warn!(
                    raw_output = %raw,
                    "not-found sentinel embedded in longer model output"
                );
            }
            return Ok(Extraction {
                answer: NOT_FOUND.to_string(),
                found: false,
            });
        }

        if answer.is_empty() {
            tracing::warn!("generation backend returned empty output, treating as not found");
            return Ok(Extraction {
                answer: NOT_FOUND.to_string(),
                found: false,
            });
        }

        Ok(Extraction {
            answer,
            found: true,
        })
    }

    async fn check_backend(&self) -> QueryResult<()> {
        self.client.check_reachable().await
    }
}
