//! Ports: trait seams between the domain and infrastructure.

pub mod embedding;
pub mod extractor;
pub mod index;

pub use embedding::EmbeddingClient;
pub use extractor::{AnswerExtractor, Extraction};
pub use index::VectorIndex;
