/// Storage contract shared by every backend
///
/// Route handlers talk to a `dyn Store` and never to a pool directly, so the
/// same handlers run against PostgreSQL in production and against the
/// in-memory store in tests.
///
/// # Guarantees every implementation must give
///
/// - `create_user` rejects a second user with the same email
///   (`StoreError::Duplicate("email")`).
/// - Each write touches exactly one record and is atomic on its own.
/// - `list_project_tasks` and `list_tasks` return newest first;
///   `list_task_comments` and `list_users`/`list_projects` oldest first.
/// - `delete_task` removes the task's comments with it.
/// - References are not re-validated: callers check that an assignee,
///   project or task exists before writing a record pointing at it.
///
/// # Example
///
/// ```
/// use taskboard_shared::db::{memory::MemoryStore, store::Store};
/// use taskboard_shared::models::user::{CreateUser, Role};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.create_user(CreateUser {
///     fullname: "Ada Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Admin,
/// }).await?;
///
/// assert!(store.find_user_by_id(user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    comment::{Comment, CreateComment},
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskFilter, UpdateTask},
    user::{CreateUser, User},
};

/// Name of the unique constraint on `users.email`
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value
    #[error("Duplicate value for unique field '{0}'")]
    Duplicate(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.constraint() == Some(USERS_EMAIL_CONSTRAINT) {
                return StoreError::Duplicate("email".to_string());
            }
        }

        StoreError::Database(err)
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for users, projects, tasks and comments
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for health reporting (e.g. "postgres", "memory")
    fn backend(&self) -> &'static str;

    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    // Users

    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    // Projects

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project>;

    async fn find_project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;

    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    // Tasks

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    async fn list_project_tasks(
        &self,
        project_id: Uuid,
        filter: &TaskFilter,
    ) -> StoreResult<Vec<Task>>;

    /// Returns `None` if the task doesn't exist
    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// Returns true if the task existed
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    async fn count_tasks(&self) -> StoreResult<i64>;

    // Comments

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment>;

    async fn list_task_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>>;
}
