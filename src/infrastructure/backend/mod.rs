//! Ollama backend integration: HTTP client, error classification, and
//! retry policy for the embedding and generation capabilities.

pub mod error;
pub mod ollama;
pub mod retry;

pub use error::BackendError;
pub use ollama::OllamaClient;
pub use retry::RetryPolicy;
