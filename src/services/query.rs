//! Query service: per-request orchestration and readiness reporting.

use std::sync::Arc;

use crate::domain::errors::{QueryError, QueryResult};
use crate::domain::models::{DebugInfo, DependencyHealth, HealthStatus, QueryResponse, RetrievedChunk};
use crate::domain::ports::{AnswerExtractor, VectorIndex};

use super::retriever::Retriever;

/// Orchestrates retrieval and extraction for each query.
///
/// All collaborators are explicitly constructed and passed in, so tests
/// can substitute a fresh in-memory index or a fake backend per run.
pub struct QueryService {
    retriever: Retriever,
    extractor: Arc<dyn AnswerExtractor>,
    index: Arc<dyn VectorIndex>,
    default_k: usize,
}

impl QueryService {
    pub fn new(
        retriever: Retriever,
        extractor: Arc<dyn AnswerExtractor>,
        index: Arc<dyn VectorIndex>,
        default_k: usize,
    ) -> Self {
        Self {
            retriever,
            extractor,
            index,
            default_k,
        }
    }

    /// Answer a query, optionally including retrieval diagnostics.
    pub async fn query(
        &self,
        query: &str,
        k: Option<usize>,
        debug: bool,
    ) -> QueryResult<QueryResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::Validation("query must not be empty".to_string()));
        }

        let k = k.unwrap_or(self.default_k).max(1);

        let retrieved = self.retriever.retrieve(query, k).await?;
        let extraction = self.extractor.extract(query, &retrieved).await?;

        let debug_info = debug.then(|| DebugInfo {
            retrieved: retrieved.iter().map(RetrievedChunk::from).collect(),
            mode: self.extractor.mode(),
        });

        Ok(QueryResponse {
            answer: extraction.answer,
            found: extraction.found,
            debug: debug_info,
        })
    }

    /// Readiness check: healthy only when the index is reachable and the
    /// active extraction strategy's backend (if any) is reachable.
    pub async fn health(&self) -> HealthStatus {
        let index = match self.index.ping().await {
            Ok(()) => DependencyHealth::ok(),
            Err(e) => DependencyHealth::failed(e.to_string()),
        };

        let backend = match self.extractor.check_backend().await {
            Ok(()) => DependencyHealth::ok(),
            Err(e) => DependencyHealth::failed(e.to_string()),
        };

        HealthStatus::new(index, backend)
    }
}
