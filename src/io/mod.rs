//! Input/output helpers.
//!
//! - measurement CSV ingest (`ingest`)
//! - measurement CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
