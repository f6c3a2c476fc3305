//! Retrieval and query response models.

use serde::{Deserialize, Serialize};

use super::chunk::Chunk;

/// A retrieved chunk with its similarity score.
///
/// The score is cosine distance: lower is better, and retrieval results
/// are always ordered ascending by score. Ties are broken by ascending
/// `chunk_index`, so earlier-appearing passages win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Which answer extraction strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Generation backend builds the answer from retrieved context.
    Production,
    /// Deterministic pass-through of retrieved context, for reproducible
    /// testing.
    Mock,
}

/// One entry of the retrieval diagnostics in a debug response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub score: f32,
    pub chunk_index: usize,
}

impl From<&ScoredChunk> for RetrievedChunk {
    fn from(scored: &ScoredChunk) -> Self {
        Self {
            text: scored.chunk.text.clone(),
            score: scored.score,
            chunk_index: scored.chunk.chunk_index,
        }
    }
}

/// Retrieval diagnostics, included only when the caller asks for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Retrieved passages, best-first.
    pub retrieved: Vec<RetrievedChunk>,
    /// The active extraction mode.
    pub mode: ExtractionMode,
}

/// The response to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Whether the knowledge source contained an answer. `false` is a
    /// successful outcome, not an error.
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}
