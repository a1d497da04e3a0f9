//! The idempotent persistence layer.
//!
//! The store exclusively owns writes to the database: the fetchers and the
//! sync coordinator never touch it directly. Every batch goes through
//! [`upsert_batch`], which guarantees that re-running a sync step over
//! already-persisted data inserts nothing and reports `saved = 0`.
//!
//! # Module structure
//!
//! - [`batch`] - the generic upsert/mark-processed discipline
//! - [`forge`] / [`tracker`] / [`workspace`] - typed wrappers per source:
//!   parent lifecycle, unprocessed-children queries, webhook patches

pub mod batch;
mod errors;
pub mod forge;
pub mod tracker;
pub mod workspace;

pub use batch::{SyncEntity, TracksProcessing, mark_processed, upsert_batch};
pub use errors::{Result, StoreError};
