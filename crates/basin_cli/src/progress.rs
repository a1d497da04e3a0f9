//! Console rendering for progress events.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use basin::sync::{ProgressEvent, ProgressKind};

/// Render a run's event stream to the terminal.
///
/// Consumes events until the terminal one and returns `true` when the run
/// completed successfully. In non-interactive contexts the events go to the
/// structured log instead of a spinner.
pub async fn render_run(mut events: mpsc::Receiver<ProgressEvent>) -> bool {
    let interactive = console::Term::stdout().is_term();
    let spinner = interactive.then(make_spinner);

    let mut success = false;
    while let Some(event) = events.recv().await {
        match event.kind {
            ProgressKind::Connect => {
                if let Some(spinner) = &spinner {
                    spinner.set_message("connected, waiting for sync...");
                } else {
                    tracing::info!("progress channel connected");
                }
            }
            ProgressKind::InProgress => {
                let line = describe(&event);
                match (&spinner, event.counts) {
                    (Some(spinner), Some(_)) => spinner.println(format!(
                        "  {} {line}",
                        style("✓").green()
                    )),
                    (Some(spinner), None) => spinner.set_message(line),
                    (None, _) => tracing::info!(step = ?event.step, "{}", event.message),
                }
            }
            ProgressKind::Completed => {
                success = true;
                if let Some(spinner) = &spinner {
                    spinner.finish_and_clear();
                    println!("{} {}", style("✔").green().bold(), event.message);
                } else {
                    tracing::info!("{}", event.message);
                }
                break;
            }
            ProgressKind::Failed => {
                if let Some(spinner) = &spinner {
                    spinner.finish_and_clear();
                    eprintln!("{} {}", style("✘").red().bold(), event.message);
                } else {
                    tracing::error!("{}", event.message);
                }
                break;
            }
        }
    }

    success
}

fn describe(event: &ProgressEvent) -> String {
    match (event.step, event.counts) {
        (Some(step), Some(counts)) => format!(
            "{step}: {} fetched, {} saved, {} skipped",
            counts.total_fetched, counts.saved, counts.skipped
        ),
        _ => event.message.clone(),
    }
}

fn make_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
