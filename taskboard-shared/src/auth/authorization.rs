/// Role-based access control
///
/// Every permission decision in Taskboard is made by [`authorize`], a pure
/// function of who is asking and what they want to do. Handlers name the
/// action; they never compare roles themselves.
///
/// # Policy
///
/// | Action          | Allowed when                         | Grant        |
/// |-----------------|--------------------------------------|--------------|
/// | `ListUsers`     | admin                                | `Full`       |
/// | `CreateProject` | admin                                | `Full`       |
/// | `ReadProjects`  | any authenticated user               | `Full`       |
/// | `CreateTask`    | admin                                | `Full`       |
/// | `ReadTasks`     | any authenticated user               | `Full`       |
/// | `UpdateTask`    | admin                                | `Full`       |
/// | `UpdateTask`    | user who is the task's assignee      | `StatusOnly` |
/// | `DeleteTask`    | admin                                | `Full`       |
/// | `CommentOnTask` | any authenticated user               | `Full`       |
/// | `ReadComments`  | any authenticated user               | `Full`       |
///
/// A denial covers the whole request. A `StatusOnly` grant is not a mask
/// applied to the payload: the caller must reject any payload that carries
/// more than the status field.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::authorization::{authorize, Action, Grant, Principal};
/// use taskboard_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let assignee = Principal { user_id: Uuid::new_v4(), role: Role::User };
///
/// let grant = authorize(&assignee, Action::UpdateTask { assigned_to: assignee.user_id });
/// assert_eq!(grant.ok(), Some(Grant::StatusOnly));
///
/// assert!(authorize(&assignee, Action::CreateProject).is_err());
/// ```

use uuid::Uuid;

use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Action requires a role the principal doesn't have
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole { required: Role, actual: Role },

    /// Principal is neither an admin nor the task's assignee
    #[error("Only an admin or the task's assignee may update this task")]
    NotAssignee,
}

/// The identity a decision is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

/// Something a principal wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    CreateProject,
    /// List projects or the tasks of a project
    ReadProjects,
    CreateTask,
    /// List all tasks or read one
    ReadTasks,
    /// Update a task currently assigned to `assigned_to`
    UpdateTask { assigned_to: Uuid },
    DeleteTask,
    CommentOnTask,
    ReadComments,
}

/// What an allowed action may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// No restriction beyond payload validation
    Full,

    /// Only the task's status may be written
    StatusOnly,
}

/// Decides whether `principal` may perform `action`
pub fn authorize(principal: &Principal, action: Action) -> Result<Grant, AuthzError> {
    match action {
        Action::ReadProjects | Action::ReadTasks | Action::CommentOnTask | Action::ReadComments => {
            Ok(Grant::Full)
        }

        Action::ListUsers | Action::CreateProject | Action::CreateTask | Action::DeleteTask => {
            require_role(principal, Role::Admin)
        }

        Action::UpdateTask { assigned_to } => match principal.role {
            Role::Admin => Ok(Grant::Full),
            Role::User if principal.user_id == assigned_to => Ok(Grant::StatusOnly),
            Role::User => Err(AuthzError::NotAssignee),
        },
    }
}

fn require_role(principal: &Principal, required: Role) -> Result<Grant, AuthzError> {
    if principal.role == required {
        Ok(Grant::Full)
    } else {
        Err(AuthzError::InsufficientRole {
            required,
            actual: principal.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn user() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: Role::User,
        }
    }

    #[test]
    fn test_admin_only_actions() {
        for action in [
            Action::ListUsers,
            Action::CreateProject,
            Action::CreateTask,
            Action::DeleteTask,
        ] {
            assert_eq!(authorize(&admin(), action), Ok(Grant::Full), "{:?}", action);
            assert_eq!(
                authorize(&user(), action),
                Err(AuthzError::InsufficientRole {
                    required: Role::Admin,
                    actual: Role::User,
                }),
                "{:?}",
                action
            );
        }
    }

    #[test]
    fn test_any_authenticated_actions() {
        for action in [
            Action::ReadProjects,
            Action::ReadTasks,
            Action::CommentOnTask,
            Action::ReadComments,
        ] {
            assert_eq!(authorize(&admin(), action), Ok(Grant::Full));
            assert_eq!(authorize(&user(), action), Ok(Grant::Full));
        }
    }

    #[test]
    fn test_admin_updates_any_task() {
        let someone_else = Uuid::new_v4();
        assert_eq!(
            authorize(&admin(), Action::UpdateTask { assigned_to: someone_else }),
            Ok(Grant::Full)
        );
    }

    #[test]
    fn test_admin_assignee_still_gets_full_grant() {
        let me = admin();
        assert_eq!(
            authorize(&me, Action::UpdateTask { assigned_to: me.user_id }),
            Ok(Grant::Full)
        );
    }

    #[test]
    fn test_assignee_gets_status_only() {
        let me = user();
        assert_eq!(
            authorize(&me, Action::UpdateTask { assigned_to: me.user_id }),
            Ok(Grant::StatusOnly)
        );
    }

    #[test]
    fn test_non_assignee_user_denied() {
        assert_eq!(
            authorize(&user(), Action::UpdateTask { assigned_to: Uuid::new_v4() }),
            Err(AuthzError::NotAssignee)
        );
    }
}
