//! Database migrations.
//!
//! Creates the `documents` table the `PostgreSQL` store keeps every
//! collection in. Migration files live in `crates/admin/migrations/`.

use tracing::info;

use bakesnplates_admin::DashboardConfig;
use bakesnplates_admin::db;

use super::CommandError;

/// Run the dashboard migrations against `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the database cannot be
/// reached, or a migration fails.
pub async fn run(config: &DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let url = config.database_url.as_ref().ok_or(CommandError::NoDatabase)?;

    info!("Connecting to database...");
    let pool = db::create_pool(url, config.store_timeout).await?;

    info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
