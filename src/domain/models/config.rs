//! Typed service configuration.
//!
//! Constructed once at process start (via `ConfigLoader`) and threaded
//! explicitly through the query service and the ingestion pipeline.

use serde::{Deserialize, Serialize};

use super::chunk::ChunkingConfig;
use super::retrieval::ExtractionMode;

/// Main configuration structure for docqa.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Vector index storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding/generation backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Source text chunking configuration.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval configuration.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Answer extraction configuration.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Ingestion source configuration.
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Retry policy for backend calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Vector index storage configuration.
///
/// The index file is disposable: deleting it and re-running ingestion is
/// the documented reset procedure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Path to the SQLite index file.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    ".docqa/index.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Embedding/generation backend (Ollama) configuration.
///
/// Model identifiers are configurable so they can be swapped per
/// deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Embedding model identifier.
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Generation model identifier.
    #[serde(default = "default_generate_model")]
    pub generate_model: String,

    /// Expected embedding dimension for the configured embed model.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Per-call timeout in seconds for backend requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_generate_model() -> String {
    "tinyllama".to_string()
}

const fn default_dimension() -> usize {
    768
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            embed_model: default_embed_model(),
            generate_model: default_generate_model(),
            dimension: default_dimension(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Default number of passages to retrieve per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Answer extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExtractorConfig {
    /// Which extraction strategy serves queries.
    #[serde(default = "default_mode")]
    pub mode: ExtractionMode,

    /// Mock mode only: passages with cosine distance above this value do
    /// not count as evidence that an answer exists.
    #[serde(default = "default_not_found_distance")]
    pub not_found_distance: f32,
}

const fn default_mode() -> ExtractionMode {
    ExtractionMode::Production
}

const fn default_not_found_distance() -> f32 {
    0.75
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            not_found_distance: default_not_found_distance(),
        }
    }
}

/// Ingestion source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestConfig {
    /// Path to the fixed source text file.
    #[serde(default = "default_source_path")]
    pub source_path: String,

    /// Stable identifier prefixed onto chunk ids.
    #[serde(default = "default_source_id")]
    pub source_id: String,
}

fn default_source_path() -> String {
    "source.txt".to_string()
}

fn default_source_id() -> String {
    "docs".to_string()
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            source_id: default_source_id(),
        }
    }
}

/// Retry policy configuration for backend calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial call. Zero disables
    /// retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff duration in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    10_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
