//! Back-office domain layer.
//!
//! Error taxonomy, settings validation, audit vocabulary, the store and
//! object-store seams, and the workflows built on them. Nothing here performs
//! I/O directly; the `db`, `storage` and `api` crates supply the backends.

pub mod activity;
pub mod audit;
pub mod error;
pub mod settings;
pub mod storage;
pub mod store;
pub mod types;
pub mod workflows;
