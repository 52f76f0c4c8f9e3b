/// Data models for Taskboard
///
/// Each model carries its record type, its creation input, and the
/// PostgreSQL queries for it. Stores in `crate::db` decide which of those
/// queries run.
///
/// # Models
///
/// - `user`: Accounts, roles and password hashes
/// - `project`: Projects created by admins
/// - `task`: Tasks inside a project, with status and priority
/// - `comment`: Append-only comments on a task
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::{CreateProject, Project};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(admin_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     title: "Launch".to_string(),
///     description: "Public launch".to_string(),
///     created_by: admin_id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod comment;
pub mod project;
pub mod task;
pub mod user;
