//! Basin - a development-activity sync engine.
//!
//! Basin crawls a code forge, an issue tracker, and a documentation
//! workspace through their REST APIs, persists a deduplicated copy of every
//! record, streams step-by-step progress to subscribed operators, and
//! accepts signature-validated webhooks for incremental updates.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, use
//!   [`connect_and_migrate`] to run migrations on connection.
//!
//! # Example
//!
//! ```ignore
//! use basin::{connect_and_migrate, sync::{ProgressHub, SyncCoordinator, SyncTarget}};
//!
//! let db = std::sync::Arc::new(connect_and_migrate("sqlite://basin.db?mode=rwc").await?);
//! let hub = ProgressHub::default();
//! let coordinator = SyncCoordinator::new(db, forge, tracker, workspace, hub.clone());
//!
//! let mut events = hub.subscribe("operator-7").await;
//! coordinator.start_full_sync(
//!     "operator-7",
//!     SyncTarget::Forge { owner: "acme".into(), name: "widget".into() },
//!     None,
//! );
//! ```

pub mod db;
pub mod entity;
pub mod forge;
pub mod http;
pub mod ingress;
pub mod queue;
pub mod retry;
pub mod source;
pub mod store;
pub mod sync;
pub mod tracker;
pub mod workspace;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use source::{ForgeApi, SourceError, TrackerApi, WorkspaceApi};
pub use store::StoreError;
pub use sync::{
    ProgressEvent, ProgressHub, ProgressKind, SyncCoordinator, SyncCount, SyncSource, SyncStep,
    SyncTarget,
};
