//! The sync & live-progress subsystem.
//!
//! # Module structure
//!
//! - [`types`] - `SyncCount`, `ProjectSyncResult`, `EntityKind`, constants
//! - [`step`] - `SyncStep`/`SyncSource` and the per-source ordered step lists
//! - [`progress`] - `ProgressEvent` and the wire event kinds
//! - [`hub`] - the per-subscriber progress channel registry
//! - [`coordinator`] - fire-and-forget step execution
//!
//! # Example
//!
//! ```ignore
//! use basin::sync::{ProgressHub, SyncCoordinator, SyncTarget};
//!
//! let hub = ProgressHub::default();
//! let coordinator = SyncCoordinator::new(db, forge, tracker, workspace, hub.clone());
//!
//! let mut events = hub.subscribe("operator-7").await;
//! coordinator.start_full_sync(
//!     "operator-7",
//!     SyncTarget::Forge { owner: "acme".into(), name: "widget".into() },
//!     None,
//! );
//! while let Some(event) = events.recv().await {
//!     println!("{}: {}", event.kind.event_name(), event.message);
//! }
//! ```

pub mod coordinator;
pub mod hub;
mod progress;
mod step;
mod types;

pub use coordinator::{SyncCoordinator, SyncError, SyncTarget};
pub use hub::{HubConfig, ProgressHub};
pub use progress::{ProgressEvent, ProgressKind};
pub use step::{FORGE_STEPS, SyncSource, SyncStep, TRACKER_STEPS, WORKSPACE_STEPS};
pub use types::{
    DEFAULT_CHANNEL_TIMEOUT_SECS, DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE, EntityKind,
    ProjectSyncResult, SyncCount,
};
