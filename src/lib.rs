//! Client for a task-tracking service: the task list view-model, status
//! changes against the service, and task form validation.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod services;
pub mod view;

pub use error::{
    ClientError, DeleteError, FetchError, LoadTaskError, RemoteError, SubmitError, UpdateError,
    ValidationError,
};
