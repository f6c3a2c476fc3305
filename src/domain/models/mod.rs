//! Domain models.

pub mod chunk;
pub mod config;
pub mod health;
pub mod retrieval;

pub use chunk::{Chunk, ChunkingConfig, EmbeddedChunk};
pub use config::{
    BackendConfig, Config, ExtractorConfig, IngestConfig, LoggingConfig, RetrievalConfig,
    RetryConfig, ServerConfig, StorageConfig,
};
pub use health::{DependencyHealth, HealthState, HealthStatus};
pub use retrieval::{DebugInfo, ExtractionMode, QueryResponse, RetrievedChunk, ScoredChunk};
