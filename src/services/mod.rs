//! Service layer modules for external integrations.
//!
//! Contains the task service client the views load from and write through.

pub mod task_store;

pub use task_store::{HttpTaskStore, RemoteTaskStore};
