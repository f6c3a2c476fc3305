//! Ollama HTTP client for the embedding and generation capabilities.
//!
//! Compatible with any server exposing the Ollama API surface
//! (`/api/embeddings`, `/api/generate`, `/api/version`). Model
//! identifiers come from configuration so deployments can swap them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::BackendError;
use super::retry::RetryPolicy;
use crate::domain::errors::{QueryError, QueryResult};
use crate::domain::models::BackendConfig;
use crate::domain::ports::EmbeddingClient;

/// HTTP client for the Ollama backend.
///
/// Carries both capabilities the pipeline needs: "given text, return a
/// vector" and "given a prompt, return text". Transient failures are
/// retried with exponential backoff; after retries are exhausted the
/// call surfaces as `BackendUnavailable`.
pub struct OllamaClient {
    http_client: reqwest::Client,
    config: BackendConfig,
    retry_policy: RetryPolicy,
}

impl OllamaClient {
    pub fn new(config: BackendConfig, retry_policy: RetryPolicy) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            config,
            retry_policy,
        })
    }

    /// One embedding call. The Ollama embeddings API takes a single
    /// prompt per request.
    async fn embeddings_once(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let request = EmbeddingsRequest {
            model: &self.config.embed_model,
            prompt: text,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(BackendError::from_status(status, body));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::UnexpectedResponse(format!("invalid embedding body: {e}")))?;

        if result.embedding.is_empty() {
            return Err(BackendError::UnexpectedResponse(
                "no embedding returned".to_string(),
            ));
        }

        Ok(result.embedding)
    }

    /// Embed one text with retries, then enforce the configured
    /// dimension. A mismatch is fatal, never retried.
    async fn embed_checked(&self, text: &str) -> QueryResult<Vec<f32>> {
        let vector = self
            .retry_policy
            .execute(|| self.embeddings_once(text))
            .await?;

        if vector.len() != self.config.dimension {
            return Err(QueryError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }

        Ok(vector)
    }

    /// Run the generation model against a prompt and return its raw text
    /// output. Temperature is pinned to zero.
    pub async fn generate(&self, prompt: &str) -> QueryResult<String> {
        let url = format!("{}/api/generate", self.config.base_url);

        let raw = self
            .retry_policy
            .execute(|| async {
                let request = GenerateRequest {
                    model: &self.config.generate_model,
                    prompt,
                    stream: false,
                    options: GenerateOptions { temperature: 0.0 },
                };

                let response = self
                    .http_client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(BackendError::from_transport)?;

                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "unable to read response body".to_string());
                    return Err(BackendError::from_status(status, body));
                }

                let result: GenerateResponse = response.json().await.map_err(|e| {
                    BackendError::UnexpectedResponse(format!("invalid generate body: {e}"))
                })?;

                Ok(result.response)
            })
            .await?;

        Ok(raw)
    }

    /// Reachability probe for readiness checks. No retries: a health
    /// check wants the current state, not the eventual one.
    pub async fn check_reachable(&self) -> QueryResult<()> {
        let url = format!("{}/api/version", self.config.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| QueryError::BackendUnavailable(BackendError::from_transport(e).to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::BackendUnavailable(format!(
                "version probe returned HTTP {status}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl EmbeddingClient for OllamaClient {
    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> QueryResult<Vec<f32>> {
        self.embed_checked(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> QueryResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for (i, text) in texts.iter().enumerate() {
            let vector = self.embed_checked(text).await.map_err(|e| match e {
                QueryError::BackendUnavailable(msg) => {
                    QueryError::BackendUnavailable(format!("embedding text {i}: {msg}"))
                }
                other => other,
            })?;
            vectors.push(vector);
        }

        Ok(vectors)
    }
}

// -- Ollama API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_config() {
        let config = BackendConfig::default();
        assert_eq!(config.embed_model, "nomic-embed-text");
        assert_eq!(config.generate_model, "tinyllama");
        assert_eq!(config.dimension, 768);
        assert_eq!(config.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_embeddings_request_shape() {
        let request = EmbeddingsRequest {
            model: "nomic-embed-text",
            prompt: "hello",
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["prompt"], "hello");
    }

    #[test]
    fn test_generate_request_pins_temperature() {
        let request = GenerateRequest {
            model: "tinyllama",
            prompt: "question",
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
    }
}
