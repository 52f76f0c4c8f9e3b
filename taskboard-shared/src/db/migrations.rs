/// Embedded schema migrations
///
/// Migration files live in `taskboard-shared/migrations/` and are compiled
/// into the binary, so a deployment needs nothing besides `DATABASE_URL`.
/// They are applied at startup before the server accepts requests.

use sqlx::postgres::PgPool;
use tracing::{error, info};

/// Applies every migration that hasn't run yet
///
/// # Errors
///
/// Returns an error if a migration fails; sqlx rolls that migration back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Migration failed");
            Err(e)
        }
    }
}
