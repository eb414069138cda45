//! Domain logic for the video catalog.
//!
//! Everything here is free of I/O so the repository layer, the HTTP layer
//! and tests can share the same rules for category reconciliation, label
//! splitting and search planning.

pub mod error;
pub mod reconcile;
pub mod search;
pub mod taxonomy;
pub mod text;
pub mod types;
