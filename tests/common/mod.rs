//! Shared helpers for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;

use async_trait::async_trait;

use docqa::domain::errors::{QueryError, QueryResult};
use docqa::domain::ports::EmbeddingClient;
use docqa::infrastructure::index::{create_test_pool, SqliteVectorIndex};

pub const SAMPLE_SOURCE: &str = "My name is Jane Doe.\n\nI live in Springfield and work as a carpenter.\n\nMy favorite color is blue.";

/// Deterministic embedding client: a hashed bag-of-words vector.
///
/// Texts sharing words land close together in cosine space, which is
/// enough signal for retrieval tests without any model backend.
pub struct FakeEmbeddingClient {
    dimension: usize,
}

impl FakeEmbeddingClient {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text.split_whitespace() {
            let token: String = token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.is_empty() {
                continue;
            }
            vector[fnv_slot(&token, self.dimension)] += 1.0;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        vector
    }
}

/// FNV-1a, reduced to a vector slot. Stable across runs and platforms.
fn fnv_slot(token: &str, dimension: usize) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    usize::try_from(hash % dimension as u64).expect("slot fits usize")
}

#[async_trait]
impl EmbeddingClient for FakeEmbeddingClient {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> QueryResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> QueryResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Embedding client standing in for an unreachable backend.
pub struct FailingEmbeddingClient;

#[async_trait]
impl EmbeddingClient for FailingEmbeddingClient {
    fn dimension(&self) -> usize {
        128
    }

    async fn embed(&self, _text: &str) -> QueryResult<Vec<f32>> {
        Err(QueryError::BackendUnavailable(
            "connection refused".to_string(),
        ))
    }

    async fn embed_batch(&self, _texts: &[String]) -> QueryResult<Vec<Vec<f32>>> {
        Err(QueryError::BackendUnavailable(
            "connection refused".to_string(),
        ))
    }
}

/// Fresh in-memory vector index for one test.
pub async fn in_memory_index() -> Arc<SqliteVectorIndex> {
    let pool = create_test_pool().await.expect("test pool");
    Arc::new(SqliteVectorIndex::new(pool).await.expect("schema init"))
}
