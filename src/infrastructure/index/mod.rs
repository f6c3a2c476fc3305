//! SQLite-backed vector index.

pub mod connection;
pub mod sqlite;

pub use connection::{create_pool, create_test_pool, ConnectionError};
pub use sqlite::SqliteVectorIndex;
