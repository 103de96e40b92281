//! `crosscheck-recon` — Two-source row reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded rows, returns classified results
//! plus their serialized, color-ranged presentation. No sink or CLI
//! dependencies.

pub mod classify;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod serialize;
pub mod source;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use model::{Classified, Key, Origin, ReconResult, Row};
