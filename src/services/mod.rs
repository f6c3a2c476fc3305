//! Service layer: pipeline orchestration.

pub mod extractor;
pub mod ingest;
pub mod query;
pub mod retriever;

pub use extractor::{GenerationExtractor, MockExtractor, NOT_FOUND};
pub use ingest::{IngestLock, IngestReport, IngestionPipeline};
pub use query::QueryService;
pub use retriever::Retriever;
