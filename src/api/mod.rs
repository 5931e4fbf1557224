//! Wire types for the task service

pub mod response;

pub use response::{ErrorResponse, TaskListResponse, TaskResponse};
