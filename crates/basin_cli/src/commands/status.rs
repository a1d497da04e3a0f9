//! `basin status` - tabulate tracked parents and their sync state.

use basin::connect_and_migrate;
use basin::entity::prelude::*;
use sea_orm::EntityTrait;
use tabled::{Table, Tabled, settings::Style};

use crate::config::Settings;

use super::CliError;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "SOURCE")]
    source: &'static str,
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "LAST SYNCED")]
    last_synced: String,
}

fn format_synced(ts: Option<sea_orm::prelude::DateTimeWithTimeZone>) -> String {
    ts.map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

pub async fn run(settings: &Settings) -> Result<(), CliError> {
    let db = connect_and_migrate(&settings.database_url).await?;

    let mut rows = Vec::new();

    for repo in Repository::find().all(&db).await? {
        rows.push(StatusRow {
            source: "forge",
            key: repo.full_name(),
            status: repo.status.to_string(),
            last_synced: format_synced(repo.last_synced_at),
        });
    }
    for project in Project::find().all(&db).await? {
        rows.push(StatusRow {
            source: "tracker",
            key: project.key,
            status: project.status.to_string(),
            last_synced: format_synced(project.last_synced_at),
        });
    }
    for workspace in Workspace::find().all(&db).await? {
        rows.push(StatusRow {
            source: "workspace",
            key: workspace.id,
            status: workspace.status.to_string(),
            last_synced: format_synced(workspace.last_synced_at),
        });
    }

    if rows.is_empty() {
        println!("no parents tracked yet - run `basin sync` first");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");

    Ok(())
}
