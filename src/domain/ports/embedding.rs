//! Embedding client port.
//!
//! The external model capability "given text, return a vector", isolated
//! behind a trait so tests can substitute a deterministic implementation.

use async_trait::async_trait;

use crate::domain::errors::QueryResult;

/// Converts text into fixed-dimension vectors via an external model
/// capability.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// The output dimension `D` every returned vector must have.
    fn dimension(&self) -> usize;

    /// Embed a single text (used for queries).
    async fn embed(&self, text: &str) -> QueryResult<Vec<f32>>;

    /// Embed a batch of texts: same order as the input, one vector per
    /// text. A failure reports which text failed.
    async fn embed_batch(&self, texts: &[String]) -> QueryResult<Vec<Vec<f32>>>;
}
