// Embedded Diesel migration runner. MigrationHarness is sync, so migrations
// run over a dedicated blocking connection rather than the async pool.

use diesel::{Connection, PgConnection};
use diesel_migrations::MigrationHarness;
use std::error::Error;
use tracing::{debug, info};

use crate::db::MIGRATIONS;

/// Whether startup should apply pending migrations.
pub fn should_run_migrations() -> bool {
    !crate::app_config::config().disable_embedded_migrations
}

/// Run all pending migrations, returning how many were applied.
pub async fn run_migrations() -> Result<usize, Box<dyn Error + Send + Sync>> {
    let database_url = crate::app_config::config().database_url.clone();

    let applied_count =
        tokio::task::spawn_blocking(move || -> Result<usize, Box<dyn Error + Send + Sync>> {
            let mut conn = PgConnection::establish(&database_url)
                .map_err(|e| format!("Failed to establish sync connection: {}", e))?;

            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to check pending migrations: {}", e))?;

            if pending.is_empty() {
                debug!("No pending migrations");
                return Ok(0);
            }

            info!("Applying {} pending migrations", pending.len());

            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| format!("Failed to run migrations: {}", e))?;

            for migration in &applied {
                debug!("Applied migration: {}", migration);
            }

            Ok(applied.len())
        })
        .await
        .map_err(|e| format!("Migration task panicked: {}", e))??;

    Ok(applied_count)
}
