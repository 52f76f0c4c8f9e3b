/// In-memory store
///
/// Keeps every table in a `Vec` in insertion order behind one async
/// `RwLock`. Insertion order is creation order, so "newest first" is a
/// reverse scan and never depends on clock resolution.
///
/// Used by the test suites and by the server when no `DATABASE_URL` is
/// configured. Data lives as long as the process.
///
/// # Example
///
/// ```
/// use taskboard_shared::db::{memory::MemoryStore, store::Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// assert_eq!(store.count_tasks().await?, 0);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Store, StoreError, StoreResult};
use crate::models::{
    comment::{Comment, CreateComment},
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskFilter, UpdateTask},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

/// Process-local store; clones share the same tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }

        let user = User::from_create(data);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        let project = Project::from_create(data);
        self.tables.write().await.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.tables.read().await.projects.clone())
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = Task::from_create(data);
        self.tables.write().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().rev().cloned().collect())
    }

    async fn list_project_tasks(
        &self,
        project_id: Uuid,
        filter: &TaskFilter,
    ) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .rev()
            .filter(|t| t.project_id == project_id && filter.matches(t))
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        Ok(tables.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            data.apply(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        let deleted = tables.tasks.len() < before;

        if deleted {
            tables.comments.retain(|c| c.task_id != id);
        }

        Ok(deleted)
    }

    async fn count_tasks(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.tasks.len() as i64)
    }

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        let comment = Comment::from_create(data);
        self.tables.write().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_task_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect())
    }
}
