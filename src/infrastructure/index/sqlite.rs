//! Vector index implementation over SQLite.
//!
//! Chunk records and their embeddings live in one table; embeddings are
//! stored as little-endian f32 BLOBs and similarity search is a full
//! scan with cosine distance computed in Rust. The collection here is a
//! single document's chunks, so a scan beats maintaining an ANN
//! structure.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::errors::{QueryError, QueryResult};
use crate::domain::models::{Chunk, EmbeddedChunk, ScoredChunk};
use crate::domain::ports::VectorIndex;

/// SQLite-backed vector index.
pub struct SqliteVectorIndex {
    pool: SqlitePool,
}

impl SqliteVectorIndex {
    /// Create the index over an existing pool, initializing the schema.
    pub async fn new(pool: SqlitePool) -> QueryResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                chunk_index INTEGER NOT NULL,
                source_offset INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                dimension INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Serialize an embedding vector to bytes for storage.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize an embedding vector from stored bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> QueryResult<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(QueryError::Index(
                "invalid embedding bytes length".to_string(),
            ));
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Cosine distance between two vectors: 1 - cosine similarity.
    ///
    /// Mismatched lengths and zero-magnitude vectors rank last.
    pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return f32::MAX;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return f32::MAX;
        }

        1.0 - (dot / (mag_a * mag_b))
    }

    /// Dimension of rows already stored, if any.
    async fn stored_dimension(&self) -> QueryResult<Option<usize>> {
        let row = sqlx::query("SELECT dimension FROM chunks LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| {
            let dim: i64 = r.get("dimension");
            usize::try_from(dim).unwrap_or(0)
        }))
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorIndex {
    async fn upsert(&self, chunks: &[EmbeddedChunk]) -> QueryResult<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        // All vectors in the collection share one dimension: the batch
        // must agree with itself and with whatever is already stored.
        let expected = match self.stored_dimension().await? {
            Some(dim) => dim,
            None => chunks[0].vector.len(),
        };

        for embedded in chunks {
            if embedded.vector.len() != expected {
                return Err(QueryError::DimensionMismatch {
                    expected,
                    actual: embedded.vector.len(),
                });
            }
        }

        let mut tx = self.pool.begin().await?;

        for embedded in chunks {
            let bytes = Self::embedding_to_bytes(&embedded.vector);
            let dim = i64::try_from(embedded.vector.len())
                .map_err(|_| QueryError::Index("embedding dimension overflow".to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO chunks (id, chunk_index, source_offset, content, embedding, dimension)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    chunk_index = excluded.chunk_index,
                    source_offset = excluded.source_offset,
                    content = excluded.content,
                    embedding = excluded.embedding,
                    dimension = excluded.dimension
                "#,
            )
            .bind(&embedded.chunk.id)
            .bind(i64::try_from(embedded.chunk.chunk_index).unwrap_or(i64::MAX))
            .bind(i64::try_from(embedded.chunk.source_offset).unwrap_or(i64::MAX))
            .bind(&embedded.chunk.text)
            .bind(bytes)
            .bind(dim)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn search(&self, query_vector: &[f32], k: usize) -> QueryResult<Vec<ScoredChunk>> {
        let rows = sqlx::query(
            "SELECT id, chunk_index, source_offset, content, embedding FROM chunks",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());

        for row in rows {
            let id: String = row.get("id");
            let chunk_index: i64 = row.get("chunk_index");
            let source_offset: i64 = row.get("source_offset");
            let content: String = row.get("content");
            let embedding_bytes: Vec<u8> = row.get("embedding");

            let embedding = Self::bytes_to_embedding(&embedding_bytes)?;
            let score = Self::cosine_distance(query_vector, &embedding);

            results.push(ScoredChunk {
                chunk: Chunk {
                    id,
                    text: content,
                    source_offset: usize::try_from(source_offset).unwrap_or(0),
                    chunk_index: usize::try_from(chunk_index).unwrap_or(0),
                },
                score,
            });
        }

        // Best-first: ascending distance, earlier passages win ties.
        results.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(a.chunk.chunk_index.cmp(&b.chunk.chunk_index))
        });
        results.truncate(k);

        Ok(results)
    }

    async fn delete_all(&self) -> QueryResult<()> {
        sqlx::query("DELETE FROM chunks").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self) -> QueryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn ping(&self) -> QueryResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
