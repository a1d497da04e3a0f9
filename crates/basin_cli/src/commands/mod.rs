pub mod migrate;
pub mod serve;
pub mod status;
pub mod sync;

use std::sync::Arc;

use basin::forge::ForgeClient;
use basin::source::{ForgeApi, TrackerApi, WorkspaceApi};
use basin::sync::{ProgressHub, SyncCoordinator};
use basin::tracker::TrackerClient;
use basin::workspace::WorkspaceClient;
use sea_orm::DatabaseConnection;

use crate::config::Settings;

pub type CliError = Box<dyn std::error::Error>;

/// Build the coordinator and hub from settings and an open connection.
pub fn build_coordinator(
    settings: &Settings,
    db: Arc<DatabaseConnection>,
) -> Result<(SyncCoordinator, ProgressHub), CliError> {
    let delay = settings.page_delay();

    let forge = ForgeClient::new(
        &settings.forge.host,
        &settings.forge.token,
        settings.page_size,
        delay,
    )?;
    let tracker = TrackerClient::new(
        &settings.tracker.host,
        &settings.tracker.token,
        settings.page_size,
        delay,
    )?;
    let workspace = WorkspaceClient::new(
        &settings.workspace.host,
        &settings.workspace.token,
        settings.page_size,
        delay,
    )?;

    let hub = ProgressHub::default();
    let coordinator = SyncCoordinator::new(
        db,
        Arc::new(forge) as Arc<dyn ForgeApi>,
        Arc::new(tracker) as Arc<dyn TrackerApi>,
        Arc::new(workspace) as Arc<dyn WorkspaceApi>,
        hub.clone(),
    );

    Ok((coordinator, hub))
}
