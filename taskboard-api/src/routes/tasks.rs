/// Task and comment endpoints
///
/// # Endpoints
///
/// - `POST /task` - Create a task (admin)
/// - `GET /task` - List all tasks
/// - `GET /task/:id` - Get a task
/// - `PATCH /task/:id` - Update a task (admin, or the assignee for status)
/// - `DELETE /task/:id` - Delete a task and its comments (admin)
/// - `POST /task/:id/comment` - Comment on a task
/// - `GET /task/:id/comments` - List a task's comments, oldest first
///
/// # Updating a task
///
/// Admins may change `title`, `description`, `assignedTo`, `priority` and
/// `status` in one request. The assignee may send exactly `{"status": ...}`.
/// Anyone else gets `403` before the body is even parsed.

use std::collections::HashMap;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    validation::{parse_id, parse_id_field, validate, ApiJson},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        authorization::{authorize, Action, Grant},
        middleware::AuthContext,
    },
    models::{
        comment::{Comment, CreateComment},
        task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Longest title the schema stores
const MAX_TITLE_CHARS: usize = 255;

/// Create task request
///
/// `assignedTo` and `projectId` are ids of an existing user and project.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "assignedTo is required"))]
    pub assigned_to: String,

    #[validate(length(min = 1, message = "projectId is required"))]
    pub project_id: String,

    /// Defaults to `Medium`
    #[serde(default)]
    pub priority: Option<TaskPriority>,
}

impl CreateTaskRequest {
    fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            assigned_to: self.assigned_to.trim().to_string(),
            project_id: self.project_id.trim().to_string(),
            priority: self.priority,
        }
    }
}

/// Partial task update
///
/// Unknown fields are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTaskRequest {
    /// Names of the present fields only an admin may write
    fn admin_fields(&self) -> Vec<&'static str> {
        [
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("assignedTo", self.assigned_to.is_some()),
            ("priority", self.priority.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }

    /// Rejects anything a status-only grant may not send
    fn check_status_only(&self) -> ApiResult<()> {
        let mut details: Vec<ValidationErrorDetail> = self
            .admin_fields()
            .into_iter()
            .map(|field| {
                ValidationErrorDetail::new(field, "Only an admin may change this field")
            })
            .collect();

        if self.status.is_none() {
            details.push(ValidationErrorDetail::new("status", "Status is required"));
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationError(details))
        }
    }

    /// Validates present fields and converts them into a store update
    fn into_update(self) -> ApiResult<UpdateTask> {
        let mut details = Vec::new();

        let mut non_blank = |field: &str, value: Option<String>| {
            let value = value.map(|v| v.trim().to_string());
            if value.as_deref() == Some("") {
                details.push(ValidationErrorDetail::new(field, format!("{} must not be empty", field)));
            }
            value
        };

        let title = non_blank("title", self.title);
        let description = non_blank("description", self.description);

        if title.as_deref().is_some_and(|t| t.chars().count() > MAX_TITLE_CHARS) {
            details.push(ValidationErrorDetail::new(
                "title",
                format!("Title must be at most {} characters", MAX_TITLE_CHARS),
            ));
        }

        let assigned_to = match self.assigned_to.as_deref().map(|id| parse_id_field("assignedTo", id)) {
            Some(Ok(id)) => Some(id),
            Some(Err(ApiError::ValidationError(mut errs))) => {
                details.append(&mut errs);
                None
            }
            Some(Err(other)) => return Err(other),
            None => None,
        };

        if !details.is_empty() {
            return Err(ApiError::ValidationError(details));
        }

        Ok(UpdateTask {
            title,
            description,
            assigned_to,
            status: self.status,
            priority: self.priority,
        })
    }
}

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment is required"))]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub message: String,
    pub comment: Comment,
}

/// A comment with its author's display name
///
/// `authorName` is `null` if the author's account no longer resolves.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,

    pub author_name: Option<String>,
}

/// Create a task (admin only)
///
/// ```text
/// POST /task
/// {
///   "title": "Write spec",
///   "description": "First draft",
///   "assignedTo": "<user id>",
///   "projectId": "<project id>",
///   "priority": "High"
/// }
/// ```
///
/// The assignee and the project are resolved before anything is written.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Caller is not an admin, whatever the body holds
/// - `404 Not Found`: Unknown assignee or project
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<ApiJson<CreateTaskRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    authorize(&auth.principal(), Action::CreateTask).map_err(|e| {
        tracing::warn!(user_id = %auth.user_id(), "Denied task creation");
        ApiError::from(e)
    })?;

    let ApiJson(req) = body?;
    let req = req.trimmed();
    validate(&req)?;

    let assigned_to = parse_id_field("assignedTo", &req.assigned_to)?;
    let project_id = parse_id_field("projectId", &req.project_id)?;

    state
        .store
        .find_user_by_id(assigned_to)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assigned user not found".to_string()))?;

    state
        .store
        .find_project_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let task = state
        .store
        .create_task(CreateTask {
            title: req.title,
            description: req.description,
            assigned_to,
            project_id,
            priority: req.priority.unwrap_or_default(),
        })
        .await?;

    tracing::info!(
        task_id = %task.id,
        project_id = %project_id,
        assigned_to = %assigned_to,
        "Task created"
    );

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully.".to_string(),
            task,
        }),
    ))
}

/// List all tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    authorize(&auth.principal(), Action::ReadTasks)?;

    Ok(Json(state.store.list_tasks().await?))
}

/// Get one task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    authorize(&auth.principal(), Action::ReadTasks)?;

    let task_id = parse_id("task id", &id)?;

    Ok(Json(load_task(&state, task_id).await?))
}

/// Update a task
///
/// ```text
/// PATCH /task/:id
/// { "status": "In Progress" }
/// ```
///
/// Checks run in this order, and nothing is written unless all pass:
/// 1. Task id parses (`400`) and the task exists (`404`)
/// 2. Caller is an admin or the assignee (`403`)
/// 3. Body is valid JSON with known fields only (`400`)
/// 4. A status-only caller sent exactly `status` (`400`, naming each offending field)
/// 5. Body is not empty and field values are valid (`400`)
/// 6. A new assignee exists (`404`)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_id("task id", &id)?;
    let task = load_task(&state, task_id).await?;

    let grant = authorize(
        &auth.principal(),
        Action::UpdateTask {
            assigned_to: task.assigned_to,
        },
    )
    .map_err(|e| {
        tracing::warn!(user_id = %auth.user_id(), task_id = %task_id, "Denied task update");
        ApiError::from(e)
    })?;

    let req: UpdateTaskRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    if grant == Grant::StatusOnly {
        req.check_status_only()?;
    }

    let update = req.into_update()?;
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be provided".to_string(),
        ));
    }

    if let Some(assignee) = update.assigned_to {
        state
            .store
            .find_user_by_id(assignee)
            .await?
            .ok_or_else(|| ApiError::NotFound("Assigned user not found".to_string()))?;
    }

    let task = state
        .store
        .update_task(task_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(
        task_id = %task.id,
        user_id = %auth.user_id(),
        status = %task.status,
        "Task updated"
    );

    Ok(Json(TaskResponse {
        message: "Task updated successfully.".to_string(),
        task,
    }))
}

/// Delete a task and its comments (admin only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    authorize(&auth.principal(), Action::DeleteTask).map_err(|e| {
        tracing::warn!(user_id = %auth.user_id(), "Denied task deletion");
        ApiError::from(e)
    })?;

    let task_id = parse_id("task id", &id)?;

    if !state.store.delete_task(task_id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %task_id, user_id = %auth.user_id(), "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully.".to_string(),
    }))
}

/// Comment on a task
///
/// ```text
/// POST /task/:id/comment
/// { "comment": "Started on this" }
/// ```
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    authorize(&auth.principal(), Action::CommentOnTask)?;

    let task_id = parse_id("task id", &id)?;

    let req = CreateCommentRequest {
        comment: req.comment.trim().to_string(),
    };
    validate(&req)?;

    load_task(&state, task_id).await?;

    let comment = state
        .store
        .create_comment(CreateComment {
            comment: req.comment,
            commented_by: auth.user_id(),
            task_id,
        })
        .await?;

    tracing::info!(comment_id = %comment.id, task_id = %task_id, "Comment added");

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment added successfully.".to_string(),
            comment,
        }),
    ))
}

/// List a task's comments, oldest first, with author names
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CommentWithAuthor>>> {
    authorize(&auth.principal(), Action::ReadComments)?;

    let task_id = parse_id("task id", &id)?;
    load_task(&state, task_id).await?;

    let comments = state.store.list_task_comments(task_id).await?;

    let mut names: HashMap<Uuid, Option<String>> = HashMap::new();
    for comment in &comments {
        if !names.contains_key(&comment.commented_by) {
            let name = state
                .store
                .find_user_by_id(comment.commented_by)
                .await?
                .map(|user| user.fullname);
            names.insert(comment.commented_by, name);
        }
    }

    let comments = comments
        .into_iter()
        .map(|comment| CommentWithAuthor {
            author_name: names.get(&comment.commented_by).cloned().flatten(),
            comment,
        })
        .collect();

    Ok(Json(comments))
}

async fn load_task(state: &AppState, id: Uuid) -> ApiResult<Task> {
    state
        .store
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}
