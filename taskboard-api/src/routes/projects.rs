/// Project endpoints
///
/// - `POST /projects` - Create a project (admin)
/// - `GET /projects` - List all projects
/// - `GET /projects/:id` - List the tasks of a project, optionally filtered

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    validation::{parse_id, validate, ApiJson, ApiQuery},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        authorization::{authorize, Action},
        middleware::AuthContext,
    },
    models::{
        project::{CreateProject, Project},
        task::{Task, TaskFilter, TaskPriority, TaskStatus},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
///
/// Fields are trimmed before validation.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

impl CreateProjectRequest {
    fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

/// Create project response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub message: String,
    pub project: Project,
}

/// Query string of `GET /projects/:id`
///
/// Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilterQuery {
    /// `true` restricts to tasks assigned to the caller
    pub assigned_to: Option<String>,

    /// `Low`, `Medium` or `High`
    pub priority: Option<String>,

    /// `Pending`, `In Progress` or `Done`
    pub status: Option<String>,
}

impl TaskFilterQuery {
    /// Resolves the query against the calling user
    pub fn into_filter(self, requester: Uuid) -> ApiResult<TaskFilter> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let assigned_to = match present(self.assigned_to).as_deref().map(str::trim) {
            None | Some("false") => None,
            Some("true") => Some(requester),
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "Invalid assignedTo '{}': expected true or false",
                    other
                )))
            }
        };

        let priority = present(self.priority)
            .map(|p| p.trim().parse::<TaskPriority>())
            .transpose()
            .map_err(ApiError::BadRequest)?;

        let status = present(self.status)
            .map(|s| s.trim().parse::<TaskStatus>())
            .transpose()
            .map_err(ApiError::BadRequest)?;

        Ok(TaskFilter {
            assigned_to,
            priority,
            status,
        })
    }
}

/// Create a project (admin only)
///
/// ```text
/// POST /projects
/// { "title": "Launch", "description": "Ship v1" }
/// ```
///
/// Responds `201 Created` with `{ "message": ..., "project": {...} }`.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<ApiJson<CreateProjectRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    authorize(&auth.principal(), Action::CreateProject).map_err(|e| {
        tracing::warn!(user_id = %auth.user_id(), "Denied project creation");
        ApiError::from(e)
    })?;

    let ApiJson(req) = body?;
    let req = req.trimmed();
    validate(&req)?;

    let project = state
        .store
        .create_project(CreateProject {
            title: req.title,
            description: req.description,
            created_by: auth.user_id(),
        })
        .await?;

    tracing::info!(project_id = %project.id, created_by = %auth.user_id(), "Project created");

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            message: "Project created successfully.".to_string(),
            project,
        }),
    ))
}

/// List all projects, oldest first
///
/// An empty list is `200 []`.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    authorize(&auth.principal(), Action::ReadProjects)?;

    Ok(Json(state.store.list_projects().await?))
}

/// List the tasks of a project, newest first
///
/// ```text
/// GET /projects/:id?assignedTo=true&priority=High&status=Done
/// ```
///
/// Filters combine with AND.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or unknown filter value
/// - `404 Not Found`: No such project
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<TaskFilterQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    authorize(&auth.principal(), Action::ReadProjects)?;

    let project_id = parse_id("project id", &id)?;
    let filter = query.into_filter(auth.user_id())?;

    state
        .store
        .find_project_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = state.store.list_project_tasks(project_id, &filter).await?;

    tracing::debug!(
        project_id = %project_id,
        count = tasks.len(),
        ?filter,
        "Listed project tasks"
    );

    Ok(Json(tasks))
}
