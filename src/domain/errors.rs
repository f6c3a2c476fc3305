//! Error taxonomy for the query pipeline.

use thiserror::Error;

/// Errors surfaced by the retrieval and serving pipeline.
///
/// A semantic "no answer in the knowledge source" is deliberately absent
/// here: it is a successful query outcome (`found = false` in the
/// response), never an error path.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed or missing request input. Surfaced immediately, never
    /// retried.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The embedding or generation backend could not be reached, or timed
    /// out, after bounded retries with backoff.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The embedding backend returned a vector whose dimension does not
    /// match the collection. Fatal to the ingestion run, never retried.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Storage-level failure in the vector index.
    #[error("Index error: {0}")]
    Index(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::Index(err.to_string())
    }
}
