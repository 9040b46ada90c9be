// Shared application state handed to every handler.

use crate::db::{create_diesel_pool, DieselDatabaseConfig, DieselPool};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub diesel_pool: DieselPool,
    pub max_connections: u32,
}

/// Build the application state: load the environment, size and create the
/// Postgres pool, and apply pending migrations unless disabled.
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let db_config = DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;

    info!("Initializing database pool...");
    let diesel_pool = create_diesel_pool(db_config).await?;

    if crate::migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        crate::migrations::run_migrations()
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    Ok(AppState {
        diesel_pool,
        max_connections,
    })
}
