//! Source text chunking.
//!
//! Splits the knowledge source into addressable passages using a
//! character-budget sliding window, preferring paragraph and sentence
//! boundaries over mid-word splits.

use anyhow::{anyhow, Result};

use crate::domain::models::{Chunk, ChunkingConfig};

/// Deterministic text chunker.
///
/// Identical input text and configuration always yield an identical
/// sequence: same boundaries, same count, same index assignment.
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid chunking config: {e}"))?;

        Ok(Self { config })
    }

    /// Split source text into ordered chunks covering the whole text.
    ///
    /// Line endings are normalized (`\r\n` to `\n`) before windowing;
    /// offsets refer to the normalized text. Empty input yields an empty
    /// sequence; input shorter than `max_chunk_size` yields one chunk.
    pub fn chunk(&self, source_id: &str, text: &str) -> Vec<Chunk> {
        let normalized = text.replace("\r\n", "\n");

        if normalized.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < normalized.len() {
            let mut end = floor_char_boundary(
                &normalized,
                (start + self.config.max_chunk_size).min(normalized.len()),
            );

            // A single code point wider than the budget still advances.
            if end <= start {
                end = ceil_char_boundary(&normalized, start + 1);
            }

            if end < normalized.len() && self.config.prefer_boundaries {
                if let Some(boundary) = snap_to_boundary(&normalized[start..end]) {
                    end = start + boundary;
                }
            }

            chunks.push(Chunk::new(
                source_id,
                normalized[start..end].to_string(),
                start,
                chunk_index,
            ));

            if end >= normalized.len() {
                break;
            }

            chunk_index += 1;

            let next = ceil_char_boundary(&normalized, end.saturating_sub(self.config.overlap));
            start = if next > start { next } else { end };
        }

        chunks
    }
}

/// Byte position just past the last natural break in `text`, if any.
///
/// A paragraph break wins over a sentence break; a split after any of
/// `.`, `!`, `?`, `\n` is the sentence-level fallback.
fn snap_to_boundary(text: &str) -> Option<usize> {
    if let Some(pos) = text.rfind("\n\n") {
        if pos > 0 {
            return Some(pos + 2);
        }
    }

    let boundaries = ['.', '!', '?', '\n'];

    for (i, c) in text.char_indices().rev() {
        if boundaries.contains(&c) {
            let pos = i + c.len_utf8();
            if pos < text.len() {
                return Some(pos);
            }
        }
    }

    None
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
