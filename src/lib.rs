//! docqa - retrieval-augmented question answering over a single fixed
//! knowledge source.
//!
//! Ingestion chunks the source text, embeds each chunk via an external
//! model capability, and persists the result in a disposable SQLite
//! vector index. At query time the question is embedded, the closest
//! passages are retrieved, and an answer extractor produces the final
//! `{answer, found}` - either through a generation backend (production)
//! or a deterministic pass-through (mock, for reproducible tests).
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, ports, and the error taxonomy
//! - **Service Layer** (`services`): ingestion, retrieval, extraction,
//!   query orchestration
//! - **Infrastructure Layer** (`infrastructure`): Ollama client, chunker,
//!   SQLite index, configuration
//! - **Adapters** (`adapters`): the HTTP surface

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{QueryError, QueryResult};
pub use domain::models::{
    Chunk, ChunkingConfig, Config, EmbeddedChunk, ExtractionMode, HealthStatus, QueryResponse,
    ScoredChunk,
};
pub use domain::ports::{AnswerExtractor, EmbeddingClient, VectorIndex};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IngestionPipeline, QueryService, Retriever};
