//! Domain layer: models, ports, and the error taxonomy.
//!
//! Pure types and trait seams with no I/O. Infrastructure and service
//! layers depend on this module, never the other way around.

pub mod errors;
pub mod models;
pub mod ports;
