//! Chunk models: the unit of retrieval.

use serde::{Deserialize, Serialize};

/// Configuration for splitting source text into chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in bytes of normalized source text.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Overlap between consecutive chunks in bytes.
    #[serde(default)]
    pub overlap: usize,

    /// Whether to snap chunk ends to paragraph/sentence boundaries.
    /// Mid-word splitting is the fallback when no boundary exists.
    #[serde(default = "default_prefer_boundaries")]
    pub prefer_boundaries: bool,
}

fn default_max_chunk_size() -> usize {
    900
}

fn default_prefer_boundaries() -> bool {
    true
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            overlap: 0,
            prefer_boundaries: default_prefer_boundaries(),
        }
    }
}

impl ChunkingConfig {
    /// Validate the chunking configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }

        if self.overlap >= self.max_chunk_size {
            return Err("overlap must be less than max_chunk_size".to_string());
        }

        Ok(())
    }
}

/// A bounded span of source text treated as the unit of retrieval.
///
/// Immutable once created. The id is derived from the source id and the
/// chunk index, so re-chunking unchanged source text yields byte-identical
/// ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier: `"{source_id}:chunk:{chunk_index}"`.
    pub id: String,

    /// The text content of this chunk.
    pub text: String,

    /// Byte offset of this chunk within the normalized source text.
    pub source_offset: usize,

    /// Position of this chunk within the source document (0-based).
    pub chunk_index: usize,
}

impl Chunk {
    pub fn new(source_id: &str, text: String, source_offset: usize, chunk_index: usize) -> Self {
        let id = format!("{source_id}:chunk:{chunk_index}");

        Self {
            id,
            text,
            source_offset,
            chunk_index,
        }
    }
}

/// A chunk paired with its embedding vector.
///
/// Created during ingestion; the vector is owned by the vector index once
/// upserted.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}
