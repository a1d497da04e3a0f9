//! `basin sync` - trigger a sync run and follow its progress.

use std::sync::Arc;

use basin::connect_and_migrate;
use basin::sync::{SyncStep, SyncTarget};

use crate::config::Settings;
use crate::progress;

use super::CliError;

/// Subscriber id for the interactive CLI session.
const CLI_SUBSCRIBER: &str = "cli";

/// Parse `owner/name` into a forge target.
pub fn parse_forge_target(repo: &str) -> Result<SyncTarget, CliError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(SyncTarget::Forge {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(format!("expected owner/name, got {repo:?}").into()),
    }
}

/// Parse an optional `--from` step name.
pub fn parse_start_from(from: Option<&str>) -> Result<Option<SyncStep>, CliError> {
    match from {
        None => Ok(None),
        Some(name) => SyncStep::parse(name)
            .map(Some)
            .ok_or_else(|| format!("unknown step: {name}").into()),
    }
}

/// Run one sync to completion, rendering progress as it streams in.
pub async fn run(
    settings: &Settings,
    target: SyncTarget,
    start_from: Option<SyncStep>,
) -> Result<(), CliError> {
    let db = Arc::new(connect_and_migrate(&settings.database_url).await?);
    let (coordinator, hub) = super::build_coordinator(settings, db)?;

    // Subscribe first so the CONNECT frame and every step event arrive.
    let events = hub.subscribe(CLI_SUBSCRIBER).await;
    coordinator.start_full_sync(CLI_SUBSCRIBER, target, start_from);

    if progress::render_run(events).await {
        Ok(())
    } else {
        Err("sync failed - see progress output; retry with --from <step>".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forge_target_requires_owner_and_name() {
        let target = parse_forge_target("acme/widget").expect("valid repo path");
        assert_eq!(
            target,
            SyncTarget::Forge {
                owner: "acme".to_string(),
                name: "widget".to_string()
            }
        );

        assert!(parse_forge_target("acme").is_err());
        assert!(parse_forge_target("/widget").is_err());
        assert!(parse_forge_target("acme/").is_err());
    }

    #[test]
    fn start_from_accepts_known_step_names() {
        assert_eq!(parse_start_from(None).unwrap(), None);
        assert_eq!(
            parse_start_from(Some("reviews")).unwrap(),
            Some(SyncStep::Reviews)
        );
        assert!(parse_start_from(Some("nope")).is_err());
    }
}
