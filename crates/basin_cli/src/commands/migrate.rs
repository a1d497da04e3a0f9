//! `basin migrate` - apply pending database migrations.

use basin::connect_and_migrate;

use crate::config::Settings;

use super::CliError;

pub async fn run(settings: &Settings) -> Result<(), CliError> {
    let db = connect_and_migrate(&settings.database_url).await?;
    drop(db);
    println!("migrations applied: {}", settings.database_url);
    Ok(())
}
