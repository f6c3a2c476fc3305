//! Ingestion pipeline: (re)build the collection from the source text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use crate::domain::models::EmbeddedChunk;
use crate::domain::ports::{EmbeddingClient, VectorIndex};
use crate::infrastructure::chunker::Chunker;

/// Chunks embedded and upserted per batch. A failed batch then names a
/// narrow range of chunks to look at.
const BATCH_SIZE: usize = 32;

/// Outcome of a completed ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub chunks: usize,
}

/// Advisory lock guarding single-writer ingestion.
///
/// Created next to the index storage with `create_new`, released on
/// drop. A run that finds the lock held fails immediately instead of
/// queueing. After a crash, the stale lock file is removed together with
/// the index as part of the delete-and-rebuild reset procedure.
pub struct IngestLock {
    path: PathBuf,
}

impl IngestLock {
    pub fn acquire(storage_path: &Path) -> Result<Self> {
        let path = lock_path(storage_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating storage directory for {}", path.display()))?;
            }
        }

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(anyhow!(
                "another ingestion run holds the lock at {}",
                path.display()
            )),
            Err(e) => {
                Err(e).with_context(|| format!("acquiring ingest lock at {}", path.display()))
            }
        }
    }
}

impl Drop for IngestLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("failed to remove ingest lock {}: {}", self.path.display(), e);
        }
    }
}

fn lock_path(storage_path: &Path) -> PathBuf {
    let mut os = storage_path.as_os_str().to_os_string();
    os.push(".ingest.lock");
    PathBuf::from(os)
}

/// Rebuilds the collection: read source text, chunk, embed, upsert.
///
/// Chunk ids are deterministic, so a re-run against unchanged source
/// text upserts the same ids with the same vectors and leaves the
/// collection observably unchanged. The collection is wiped first; a run
/// that fails mid-way leaves it partially populated, which is logged and
/// recovered by re-running (or deleting the storage and re-running).
pub struct IngestionPipeline {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    source_path: PathBuf,
    source_id: String,
}

impl IngestionPipeline {
    pub fn new(
        chunker: Chunker,
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn VectorIndex>,
        source_path: impl Into<PathBuf>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            index,
            source_path: source_path.into(),
            source_id: source_id.into(),
        }
    }

    pub async fn run(&self) -> Result<IngestReport> {
        let raw = tokio::fs::read_to_string(&self.source_path)
            .await
            .with_context(|| {
                format!("source text not readable: {}", self.source_path.display())
            })?;

        let chunks = self.chunker.chunk(&self.source_id, &raw);

        self.index
            .delete_all()
            .await
            .context("wiping collection before rebuild")?;

        if chunks.is_empty() {
            tracing::warn!(
                "source {} produced no chunks, collection left empty",
                self.source_path.display()
            );
            return Ok(IngestReport { chunks: 0 });
        }

        tracing::info!(
            "chunked {} into {} chunks",
            self.source_path.display(),
            chunks.len()
        );

        let mut ingested = 0;

        for (batch_no, batch) in chunks.chunks(BATCH_SIZE).enumerate() {
            let first = batch_no * BATCH_SIZE;
            let last = first + batch.len() - 1;

            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();

            let vectors = self
                .embedder
                .embed_batch(&texts)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "embedding batch {} (chunks {}..={}) failed: {}; \
                         collection is partially rebuilt ({} of {} chunks)",
                        batch_no,
                        first,
                        last,
                        e,
                        ingested,
                        chunks.len()
                    );
                    anyhow!(e).context(format!(
                        "embedding batch {batch_no} (chunks {first}..={last})"
                    ))
                })?;

            let embedded: Vec<EmbeddedChunk> = batch
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(chunk, vector)| EmbeddedChunk { chunk, vector })
                .collect();

            self.index.upsert(&embedded).await.map_err(|e| {
                tracing::error!(
                    "upserting batch {} (chunks {}..={}) failed: {}; \
                     collection is partially rebuilt ({} of {} chunks)",
                    batch_no,
                    first,
                    last,
                    e,
                    ingested,
                    chunks.len()
                );
                anyhow!(e).context(format!(
                    "upserting batch {batch_no} (chunks {first}..={last})"
                ))
            })?;

            ingested += batch.len();
        }

        tracing::info!("ingested {} chunks into the collection", ingested);

        Ok(IngestReport { chunks: ingested })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive_and_released_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = dir.path().join("index.db");

        let lock = IngestLock::acquire(&storage).expect("first acquire");
        assert!(IngestLock::acquire(&storage).is_err());

        drop(lock);
        let again = IngestLock::acquire(&storage).expect("acquire after release");
        drop(again);
    }

    #[test]
    fn test_lock_path_is_next_to_storage() {
        let path = lock_path(Path::new("/tmp/data/index.db"));
        assert_eq!(path, Path::new("/tmp/data/index.db.ingest.lock"));
    }
}
