//! Query-time retrieval.

use std::sync::Arc;

use crate::domain::errors::QueryResult;
use crate::domain::models::ScoredChunk;
use crate::domain::ports::{EmbeddingClient, VectorIndex};

/// Embeds a query and ranks collection entries by similarity.
///
/// Embedding failures propagate as `BackendUnavailable`; they are never
/// degraded to an empty result.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Retrieve the `k` passages closest to the query, best-first.
    pub async fn retrieve(&self, query: &str, k: usize) -> QueryResult<Vec<ScoredChunk>> {
        tracing::debug!("Retrieving context for query: {}", query);

        let query_vector = self.embedder.embed(query).await?;
        let results = self.index.search(&query_vector, k).await?;

        tracing::debug!("Found {} relevant passages", results.len());

        Ok(results)
    }
}
