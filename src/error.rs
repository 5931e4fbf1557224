//! Client error types
//!
//! Validation failures keep the form open; remote failures are shown as a
//! transient message. Every variant displays text suitable for the user.

use thiserror::Error;

use crate::domain::tasks::TaskId;
use crate::view::form::FormMode;

/// Task form input rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Deadline is required")]
    MissingDeadline,

    #[error("Invalid deadline date")]
    InvalidDeadline,

    #[error("Title must be at most {max} characters")]
    TitleTooLong { max: usize },

    #[error("Description must be at most {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Unknown priority: {0}")]
    InvalidPriority(String),
}

/// Failure reported by a task store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Task service unavailable: {0}")]
    Unavailable(String),

    #[error("Not authorized")]
    Unauthorized { message: Option<String> },

    #[error("Not found")]
    NotFound { message: Option<String> },

    #[error("Task service returned {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Invalid task service response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Message the server supplied with the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load tasks. Please try again.")]
pub struct FetchError(#[source] pub RemoteError);

/// Failure to load a single task into the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadTaskError {
    #[error("Task not found")]
    Missing(TaskId),

    #[error("Failed to load task. Please try again.")]
    Remote(#[source] RemoteError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to delete task. Please try again.")]
pub struct DeleteError(#[source] pub RemoteError);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to update task status. Please try again.")]
pub struct UpdateError(#[source] pub RemoteError);

/// Failure of a create or edit submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", submit_message(.mode, .source))]
    Remote {
        mode: FormMode,
        #[source]
        source: RemoteError,
    },
}

impl SubmitError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn submit_message(mode: &FormMode, source: &RemoteError) -> String {
    match source.server_message() {
        Some(message) => message.to_string(),
        None => format!("Failed to {} task. Please try again.", mode.verb()),
    }
}

/// Any failure surfaced by the task views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    LoadTask(#[from] LoadTaskError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl ClientError {
    /// Whether the failure came from local input checks rather than the
    /// task service.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Submit(e) => e.is_validation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_display_user_messages() {
        let e = FetchError(RemoteError::Unavailable("connection refused".into()));
        assert_eq!(e.to_string(), "Failed to load tasks. Please try again.");

        let e = UpdateError(RemoteError::NotFound { message: None });
        assert_eq!(e.to_string(), "Failed to update task status. Please try again.");
    }

    #[test]
    fn submit_prefers_server_message() {
        let e = SubmitError::Remote {
            mode: FormMode::Create,
            source: RemoteError::Rejected {
                status: 400,
                message: Some("Deadline must be in the future".into()),
            },
        };
        assert_eq!(e.to_string(), "Deadline must be in the future");

        let e = SubmitError::Remote {
            mode: FormMode::Edit(TaskId::new("t1")),
            source: RemoteError::Unavailable("timeout".into()),
        };
        assert_eq!(e.to_string(), "Failed to update task. Please try again.");
    }

    #[test]
    fn submit_shows_server_message_for_any_status() {
        let e = SubmitError::Remote {
            mode: FormMode::Edit(TaskId::new("gone")),
            source: RemoteError::NotFound {
                message: Some("Task not found or not owned by you".into()),
            },
        };
        assert_eq!(e.to_string(), "Task not found or not owned by you");

        let e = SubmitError::Remote {
            mode: FormMode::Create,
            source: RemoteError::Unauthorized {
                message: Some("Session expired".into()),
            },
        };
        assert_eq!(e.to_string(), "Session expired");
    }

    #[test]
    fn missing_list_endpoint_is_a_load_failure() {
        let e = FetchError(RemoteError::NotFound { message: None });
        assert_eq!(e.to_string(), "Failed to load tasks. Please try again.");

        let e = LoadTaskError::Missing(TaskId::new("t9"));
        assert_eq!(e.to_string(), "Task not found");
    }

    #[test]
    fn validation_is_distinguishable_from_remote() {
        let e: ClientError = SubmitError::from(ValidationError::MissingTitle).into();
        assert!(e.is_validation());

        let e: ClientError = DeleteError(RemoteError::Unauthorized { message: None }).into();
        assert!(!e.is_validation());
    }
}
