//! Layered CLI configuration.
//!
//! Values are read from `~/.config/basin/config.toml` (or
//! `$XDG_CONFIG_HOME/basin/config.toml`) and then overridden by `BASIN_*`
//! environment variables, e.g. `BASIN_FORGE__TOKEN` or `BASIN_DATABASE_URL`.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;

/// One upstream source's connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub host: String,
    /// Opaque credential: bearer token for the forge and workspace,
    /// pre-encoded basic-auth for the tracker.
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub forge: SourceSettings,
    pub tracker: SourceSettings,
    pub workspace: SourceSettings,
    /// Items requested per page from list endpoints.
    pub page_size: u32,
    /// Fixed minimum delay between requests to one upstream host.
    pub page_delay_ms: u64,
    /// Shared secret for webhook signature validation.
    pub webhook_secret: String,
    /// Branch whose pushes are applied incrementally.
    pub target_branch: String,
    /// Bind address for `basin serve`.
    pub bind: String,
}

impl Settings {
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Path of the config file, if a home directory is resolvable.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "basin").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default on-disk database location.
fn default_database_url() -> String {
    ProjectDirs::from("", "", "basin")
        .map(|dirs| {
            let path = dirs.data_local_dir().join("basin.db");
            format!("sqlite://{}?mode=rwc", path.display())
        })
        .unwrap_or_else(|| "sqlite://basin.db?mode=rwc".to_string())
}

/// Load settings from file and environment.
///
/// # Errors
/// Returns a `config::ConfigError` when the file is malformed or a required
/// value (source hosts/tokens) is missing everywhere.
pub fn load() -> Result<Settings, config::ConfigError> {
    let mut builder = Config::builder()
        .set_default("database_url", default_database_url())?
        .set_default("page_size", i64::from(basin::sync::DEFAULT_PAGE_SIZE))?
        .set_default("page_delay_ms", basin::sync::DEFAULT_PAGE_DELAY_MS as i64)?
        .set_default("webhook_secret", "")?
        .set_default("target_branch", "main")?
        .set_default("bind", "127.0.0.1:8086")?;

    if let Some(path) = config_file() {
        builder = builder.add_source(File::from(path).required(false));
    }

    builder
        .add_source(Environment::with_prefix("BASIN").separator("__"))
        .build()?
        .try_deserialize()
}
