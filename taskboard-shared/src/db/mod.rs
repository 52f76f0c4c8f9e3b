/// Persistence layer for Taskboard
///
/// # Modules
///
/// - `store`: The `Store` trait every backend implements
/// - `postgres`: `Store` over a sqlx PostgreSQL pool
/// - `memory`: `Store` over in-process tables
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: Embedded schema migrations
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_shared::db::{
///     migrations::run_migrations,
///     pool::{create_pool, DatabaseConfig},
///     postgres::PgStore,
///     store::Store,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///     run_migrations(&pool).await?;
///
///     let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
///     Ok(())
/// }
/// ```

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod store;
