//! Basin CLI - operate the development-activity sync engine.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use basin::sync::SyncTarget;

#[derive(Parser)]
#[command(name = "basin")]
#[command(version)]
#[command(about = "Sync development activity from a forge, a tracker, and a workspace")]
#[command(
    long_about = "Basin crawls a code forge, an issue tracker, and a documentation workspace, \
persists a deduplicated copy of every record, and reports step-by-step progress. \
Failed runs resume from any step without repeating completed work."
)]
#[command(after_long_help = r#"EXAMPLES
    Full sync of a repository, following progress:
        $ basin sync forge acme/widget

    Resume a failed run from the comments step:
        $ basin sync forge acme/widget --from comments

    Sync a tracker project and a workspace:
        $ basin sync tracker ENG
        $ basin sync workspace DOCS

    Show every tracked parent and its sync state:
        $ basin status

    Serve webhooks, progress streams, and sync triggers:
        $ basin serve

CONFIGURATION
    Basin reads configuration from:
      1. ~/.config/basin/config.toml (or $XDG_CONFIG_HOME/basin/config.toml)
      2. Environment variables (BASIN_* prefix, nested keys use __)

ENVIRONMENT VARIABLES
    BASIN_DATABASE_URL        Database connection string
    BASIN_FORGE__HOST         Forge base URL
    BASIN_FORGE__TOKEN        Forge bearer token
    BASIN_TRACKER__HOST       Tracker base URL
    BASIN_TRACKER__TOKEN      Tracker basic-auth credential
    BASIN_WORKSPACE__HOST     Workspace base URL
    BASIN_WORKSPACE__TOKEN    Workspace bearer token
    BASIN_WEBHOOK_SECRET      Shared secret for webhook signatures
    BASIN_TARGET_BRANCH       Branch applied incrementally from pushes
    BASIN_BIND                Bind address for `basin serve`
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run a sync and follow its progress
    Sync {
        #[command(subcommand)]
        source: SyncSourceCommand,
    },
    /// Show tracked parents and their sync state
    Status,
    /// Serve the webhook endpoint and progress streams
    Serve,
}

#[derive(Subcommand)]
enum SyncSourceCommand {
    /// Sync a forge repository (owner/name)
    Forge {
        /// Repository as owner/name
        repo: String,
        /// Resume from this step instead of the beginning
        #[arg(long)]
        from: Option<String>,
    },
    /// Sync a tracker project by key
    Tracker {
        /// Project key (e.g. ENG)
        key: String,
        /// Resume from this step instead of the beginning
        #[arg(long)]
        from: Option<String>,
    },
    /// Sync a documentation workspace by key
    Workspace {
        /// Workspace key (e.g. DOCS)
        key: String,
        /// Resume from this step instead of the beginning
        #[arg(long)]
        from: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Keep the interactive output clean unless asked otherwise.
            EnvFilter::new("basin=warn,basin_cli=info")
        }))
        .init();

    let cli = Cli::parse();
    let settings = config::load()?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&settings).await,
        Commands::Sync { source } => {
            let (target, from) = match source {
                SyncSourceCommand::Forge { repo, from } => {
                    (commands::sync::parse_forge_target(&repo)?, from)
                }
                SyncSourceCommand::Tracker { key, from } => (SyncTarget::Tracker { key }, from),
                SyncSourceCommand::Workspace { key, from } => (SyncTarget::Workspace { key }, from),
            };
            let start_from = commands::sync::parse_start_from(from.as_deref())?;
            commands::sync::run(&settings, target, start_from).await
        }
        Commands::Status => commands::status::run(&settings).await,
        Commands::Serve => commands::serve::run(&settings).await,
    }
}
