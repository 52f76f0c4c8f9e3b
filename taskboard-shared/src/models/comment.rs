/// Comment model and database operations
///
/// Comments are append-only notes on a task. There is no edit or delete
/// path; they disappear only with their task.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY,
///     comment TEXT NOT NULL,
///     commented_by UUID NOT NULL REFERENCES users(id),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,

    /// Free-text body
    pub comment: String,

    /// Author
    pub commented_by: Uuid,

    pub task_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub comment: String,
    pub commented_by: Uuid,
    pub task_id: Uuid,
}

impl Comment {
    pub fn from_create(data: CreateComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            comment: data.comment,
            commented_by: data.commented_by,
            task_id: data.task_id,
            created_at: Utc::now(),
        }
    }

    /// Appends a comment to a task
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, comment, commented_by, task_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, comment, commented_by, task_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.comment)
        .bind(data.commented_by)
        .bind(data.task_id)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists the comments of a task, oldest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, comment, commented_by, task_id, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
