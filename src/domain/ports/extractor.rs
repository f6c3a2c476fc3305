//! Answer extractor port.
//!
//! One capability, two interchangeable strategies: a deterministic
//! pass-through for reproducible testing, and a generation backend for
//! production. Everything upstream of this seam stays deterministic.

use async_trait::async_trait;

use crate::domain::errors::QueryResult;
use crate::domain::models::{ExtractionMode, ScoredChunk};

/// The outcome of answer extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub answer: String,
    pub found: bool,
}

/// Turns retrieved passages into a final answer.
#[async_trait]
pub trait AnswerExtractor: Send + Sync {
    /// Which strategy this is, reported in debug responses.
    fn mode(&self) -> ExtractionMode;

    /// Produce `{answer, found}` from the query and the retrieved
    /// passages (best-first). A semantic "not found" is a successful
    /// extraction with `found = false`; backend failures are errors.
    async fn extract(&self, query: &str, retrieved: &[ScoredChunk]) -> QueryResult<Extraction>;

    /// Probe whatever backend this strategy depends on, for readiness
    /// checks. Strategies without a backend return `Ok(())`.
    async fn check_backend(&self) -> QueryResult<()>;
}
