/// Database migration runner
///
/// Migrations live in `notesaas-shared/migrations/` and are embedded into
/// the binary at compile time with `sqlx::migrate!`, so a deployed server
/// never depends on the source tree.
///
/// # Example
///
/// ```no_run
/// use notesaas_shared::db::pool::{create_pool, DatabaseConfig};
/// use notesaas_shared::db::migrations::{ensure_database_exists, run_migrations};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let url = std::env::var("DATABASE_URL")?;
///     ensure_database_exists(&url).await?;
///
///     let pool = create_pool(DatabaseConfig { url, ..Default::default() }).await?;
///     let applied = run_migrations(&pool).await?;
///     println!("schema at version {:?}", applied);
///     Ok(())
/// }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending migrations
///
/// # Returns
///
/// The latest migration version known to the binary, if any
///
/// # Errors
///
/// Returns an error if a migration fails to apply or a previously applied
/// migration was modified.
pub async fn run_migrations(pool: &PgPool) -> Result<Option<i64>, sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrator = sqlx::migrate!("./migrations");
    let latest = migrator.iter().map(|m| m.version).max();

    match migrator.run(pool).await {
        Ok(()) => {
            info!(latest_version = ?latest, "Database migrations completed");
            Ok(latest)
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// Convenient for local development; production databases are expected
/// to be provisioned already.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database does not exist, creating it");
    Postgres::create_database(database_url).await?;
    info!("Database created");

    Ok(())
}
