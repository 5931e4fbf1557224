//! Task list view-model
//!
//! Works against a [`TaskCollection`] owned by the screen that shows the
//! list. The collection lives as long as that screen; the task service is
//! the source of truth whenever it is reloaded.

use chrono::{DateTime, TimeZone};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::tasks::{FilterCriterion, Task, TaskCollection, TaskId, TaskStatus};
use crate::error::{DeleteError, FetchError, UpdateError};
use crate::services::RemoteTaskStore;
use crate::view::card::TaskCard;
use crate::view::status::{self, StatusUpdateController};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// Yes/no gate consulted before a task is deleted.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct TaskListViewModel<'c, S: RemoteTaskStore> {
    store: Arc<S>,
    tasks: &'c mut TaskCollection,
    status: StatusUpdateController<S>,
    filter: FilterCriterion,
    last_error: Option<String>,
}

impl<'c, S: RemoteTaskStore> TaskListViewModel<'c, S> {
    pub fn new(store: Arc<S>, tasks: &'c mut TaskCollection) -> Self {
        Self {
            status: StatusUpdateController::new(Arc::clone(&store)),
            store,
            tasks,
            filter: FilterCriterion::All,
            last_error: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterCriterion) -> Self {
        self.filter = filter;
        self
    }

    pub fn tasks(&self) -> &TaskCollection {
        &*self.tasks
    }

    /// Error from the last load, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the collection with a full fetch. On failure the previous
    /// collection stays as it was.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&TaskCollection, FetchError> {
        match self.store.list_tasks().await {
            Ok(fetched) => {
                info!(count = fetched.len(), "Tasks loaded");
                self.tasks.replace_all(fetched);
                self.last_error = None;
                Ok(&*self.tasks)
            }
            Err(e) => {
                warn!(error = %e, kept = self.tasks.len(), "Failed to load tasks");
                let err = FetchError(e);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Tasks matching `criterion`, in load order.
    pub fn filter(&self, criterion: FilterCriterion) -> Vec<&Task> {
        self.tasks.filter(criterion)
    }

    pub fn current_filter(&self) -> FilterCriterion {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterCriterion) {
        self.filter = filter;
    }

    /// Tasks under the selected filter.
    pub fn visible(&self) -> Vec<&Task> {
        self.filter(self.filter)
    }

    /// Cards for the selected filter, derived fresh for `now`.
    pub fn cards<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TaskCard<'_>>
    where
        Tz::Offset: fmt::Display,
    {
        self.visible()
            .into_iter()
            .map(|task| TaskCard::new(task, now))
            .collect()
    }

    /// Text shown when the selected filter matches nothing.
    pub fn empty_message(&self) -> String {
        match self.filter {
            FilterCriterion::All => {
                "You don't have any tasks yet. Create your first task!".to_string()
            }
            other => format!("No {other} tasks found."),
        }
    }

    /// Delete `id` once `confirm` agrees. Declining is not an error.
    #[instrument(skip(self, confirm))]
    pub async fn remove(&mut self, id: &TaskId, confirm: &impl Confirm) -> Result<(), DeleteError> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!("Delete cancelled");
            return Ok(());
        }

        self.store.delete_task(id).await.map_err(|e| {
            warn!(error = %e, "Failed to delete task");
            DeleteError(e)
        })?;

        if self.tasks.remove(id).is_some() {
            info!(task_id = %id, "Task deleted");
        }
        Ok(())
    }

    /// Move `id` to `status`, showing whatever the task service returns.
    pub async fn set_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<Task, UpdateError> {
        self.status.set_status(&mut *self.tasks, id, status).await
    }

    /// Controller for issuing status changes without holding the view-model.
    pub fn status_controller(&self) -> StatusUpdateController<S> {
        self.status.clone()
    }

    /// Apply a response obtained through [`Self::status_controller`]. Tasks
    /// deleted in the meantime stay deleted.
    pub fn apply_status_response(&mut self, task: Task) -> bool {
        status::apply_response(&mut *self.tasks, task)
    }

    /// Reflect a task just created or edited through the form.
    pub fn apply_saved(&mut self, task: Task) {
        self.tasks.upsert(task);
    }
}
