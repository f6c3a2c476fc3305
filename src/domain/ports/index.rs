//! Vector index port.

use async_trait::async_trait;

use crate::domain::errors::QueryResult;
use crate::domain::models::{EmbeddedChunk, ScoredChunk};

/// Durable storage of embedded chunks with nearest-neighbor lookup.
///
/// The collection is read-only at query time; concurrent reads are safe.
/// The whole collection is disposable and reconstructible by re-running
/// ingestion.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace chunks by id. Persisted before returning.
    async fn upsert(&self, chunks: &[EmbeddedChunk]) -> QueryResult<()>;

    /// Return the `k` entries closest to `query_vector`, best-first
    /// (ascending cosine distance, ties broken by ascending chunk index).
    /// `k` larger than the collection returns all entries; an empty
    /// collection returns an empty result.
    async fn search(&self, query_vector: &[f32], k: usize) -> QueryResult<Vec<ScoredChunk>>;

    /// Clear the collection. Idempotent: a no-op when already empty.
    async fn delete_all(&self) -> QueryResult<()>;

    /// Number of chunks currently stored.
    async fn count(&self) -> QueryResult<u64>;

    /// Cheap reachability probe for readiness checks.
    async fn ping(&self) -> QueryResult<()>;
}
