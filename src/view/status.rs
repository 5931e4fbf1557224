//! Task status changes from the list view.
//!
//! The collection only changes once the task service has answered, and then
//! to the task the service returned. A failed call leaves it untouched, so
//! there is nothing to roll back.
//!
//! Several changes may be in flight at once when callers use [`request`] and
//! [`apply_response`] separately. Responses are applied in the order they
//! arrive, so the last response to arrive wins even if its request was issued
//! first.
//!
//! [`request`]: StatusUpdateController::request

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::tasks::{Task, TaskCollection, TaskId, TaskStatus, TaskUpdate};
use crate::error::UpdateError;
use crate::services::RemoteTaskStore;

pub struct StatusUpdateController<S: RemoteTaskStore> {
    store: Arc<S>,
}

impl<S: RemoteTaskStore> Clone for StatusUpdateController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RemoteTaskStore> StatusUpdateController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Ask the task service to move `id` to `status`. Does not touch any
    /// collection; the returned task can be dropped if nobody is interested
    /// any more.
    #[instrument(skip(self))]
    pub async fn request(&self, id: &TaskId, status: TaskStatus) -> Result<Task, UpdateError> {
        let task = self
            .store
            .update_task(id, &TaskUpdate::status(status))
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to update task status");
                UpdateError(e)
            })?;

        if task.status != status {
            debug!(requested = %status, returned = %task.status, "Task service chose a different status");
        }

        Ok(task)
    }

    /// Request the change and, on success, put the returned task in place of
    /// the old one.
    pub async fn set_status(
        &self,
        tasks: &mut TaskCollection,
        id: &TaskId,
        status: TaskStatus,
    ) -> Result<Task, UpdateError> {
        let task = self.request(id, status).await?;
        apply_response(tasks, task.clone());
        Ok(task)
    }
}

/// Apply a task returned by the service. Returns `false` when the task is no
/// longer in the collection, in which case the response is dropped.
pub fn apply_response(tasks: &mut TaskCollection, task: Task) -> bool {
    let id = task.id.clone();
    let status = task.status;

    if tasks.apply_update(task) {
        info!(task_id = %id, status = %status, "Task status updated");
        true
    } else {
        debug!(task_id = %id, "Discarding status response for task no longer listed");
        false
    }
}
