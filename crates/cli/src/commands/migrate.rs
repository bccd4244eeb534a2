//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! freshkeep-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `FRESHKEEP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary at compile time.

use freshkeep_server::config::FreshkeepConfig;
use freshkeep_server::db::{self, MIGRATOR};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable
/// or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = FreshkeepConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        "Running migrations..."
    );
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
