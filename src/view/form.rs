//! Task create/edit form
//!
//! Raw form fields are validated and normalized into a [`TaskPayload`] before
//! anything reaches the task service. The deadline field holds a local
//! wall-clock time (`YYYY-MM-DDTHH:MM`); the payload carries the absolute
//! instant.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::tasks::{Task, TaskId, TaskPayload, TaskPriority, TaskStatus, TaskUpdate};
use crate::error::{LoadTaskError, SubmitError, ValidationError};
use crate::services::RemoteTaskStore;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Format the deadline input emits and the form prefills with.
const FORM_DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const FORM_DEADLINE_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Whether the form creates a new task or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

impl FormMode {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit(_) => "update",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Edit(id) => write!(f, "edit {id}"),
        }
    }
}

/// Form fields exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub status: String,
    pub priority: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            deadline: String::new(),
            status: TaskStatus::default().as_str().to_string(),
            priority: TaskPriority::default().as_str().to_string(),
        }
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill the form from a stored task, in the local timezone.
    pub fn from_task(task: &Task) -> Self {
        Self::from_task_in(task, &Local)
    }

    pub fn from_task_in<Tz: TimeZone>(task: &Task, tz: &Tz) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: to_form_string(&task.deadline, tz),
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
        }
    }

    /// Validate against the local timezone.
    pub fn validate(&self) -> Result<TaskPayload, ValidationError> {
        self.validate_in(&Local)
    }

    /// Validate and normalize, interpreting the deadline as wall-clock time
    /// in `tz`. Stops at the first failing rule.
    pub fn validate_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<TaskPayload, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let deadline = self.deadline.trim();
        if deadline.is_empty() {
            return Err(ValidationError::MissingDeadline);
        }
        let deadline = parse_deadline(deadline, tz).ok_or(ValidationError::InvalidDeadline)?;

        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
            });
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX_CHARS,
            });
        }

        let status = match self.status.trim() {
            "" => TaskStatus::default(),
            s => s.parse()?,
        };
        let priority = match self.priority.trim() {
            "" => TaskPriority::default(),
            p => p.parse()?,
        };

        Ok(TaskPayload {
            title: title.to_string(),
            description: self.description.clone(),
            deadline,
            status,
            priority,
        })
    }
}

/// Render an absolute deadline as the wall-clock string the form accepts.
/// Inverse of the deadline normalization in [`TaskForm::validate_in`].
/// Seconds and fractions are only written when present.
pub fn to_form_string<Tz: TimeZone>(deadline: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let local = deadline.with_timezone(tz);
    let format = if local.second() == 0 && local.nanosecond() == 0 {
        FORM_DEADLINE_FORMAT
    } else {
        FORM_DEADLINE_FORMAT_SECONDS
    };
    local.format(format).to_string()
}

fn parse_deadline<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(absolute) = DateTime::parse_from_rfc3339(raw) {
        return Some(absolute.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, FORM_DEADLINE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FORM_DEADLINE_FORMAT_SECONDS))
        .ok()?;

    // A wall-clock time skipped by a DST jump has no instant; a repeated one
    // resolves to the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Loads tasks into the form and submits it.
pub struct TaskFormController<S: RemoteTaskStore> {
    store: Arc<S>,
}

impl<S: RemoteTaskStore> TaskFormController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch a task for edit mode and prefill the form with it.
    #[instrument(skip(self))]
    pub async fn load_for_edit(&self, id: &TaskId) -> Result<TaskForm, LoadTaskError> {
        let tasks = self.store.list_tasks().await.map_err(|e| {
            warn!(error = %e, "Failed to load task for editing");
            LoadTaskError::Remote(e)
        })?;

        let task = tasks
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| LoadTaskError::Missing(id.clone()))?;

        Ok(TaskForm::from_task(task))
    }

    /// Validate `form` in the local timezone and submit it.
    pub async fn submit(&self, form: &TaskForm, mode: &FormMode) -> Result<Task, SubmitError> {
        let payload = form.validate()?;
        self.submit_payload(payload, mode).await
    }

    /// Create or update with an already validated payload.
    #[instrument(skip(self, payload, mode), fields(mode = %mode))]
    pub async fn submit_payload(
        &self,
        payload: TaskPayload,
        mode: &FormMode,
    ) -> Result<Task, SubmitError> {
        debug!(title = %payload.title, deadline = %payload.deadline, "Submitting task");

        let result = match mode {
            FormMode::Create => self.store.create_task(&payload).await,
            FormMode::Edit(id) => self.store.update_task(id, &TaskUpdate::from(payload)).await,
        };

        match result {
            Ok(task) => {
                info!(task_id = %task.id, "Task saved");
                Ok(task)
            }
            Err(source) => {
                warn!(error = %source, "Task submission failed");
                Err(SubmitError::Remote {
                    mode: mode.clone(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tasks::fixtures::task;
    use crate::error::RemoteError;
    use crate::services::task_store::testing::FakeTaskStore;
    use chrono::FixedOffset;

    fn form(title: &str, deadline: &str) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            deadline: deadline.to_string(),
            ..TaskForm::new()
        }
    }

    fn berlin() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn blank_title_is_missing() {
        let result = form("  ", "2025-01-01T10:00").validate_in(&Utc);
        assert_eq!(result, Err(ValidationError::MissingTitle));
    }

    #[test]
    fn empty_deadline_is_missing() {
        let result = form("Ship report", "").validate_in(&Utc);
        assert_eq!(result, Err(ValidationError::MissingDeadline));
    }

    #[test]
    fn title_rule_runs_before_deadline_rule() {
        let result = form("", "").validate_in(&Utc);
        assert_eq!(result, Err(ValidationError::MissingTitle));
    }

    #[test]
    fn garbage_deadline_is_invalid() {
        for raw in ["tomorrow", "2025-13-01T10:00", "2025-02-30T10:00", "2025-01-01"] {
            let result = form("Ship report", raw).validate_in(&Utc);
            assert_eq!(result, Err(ValidationError::InvalidDeadline), "{raw}");
        }
    }

    #[test]
    fn normalizes_with_defaults() {
        let mut input = form("  Ship report ", "2025-01-01T10:00");
        input.status = String::new();
        input.priority = String::new();

        let payload = input.validate_in(&berlin()).unwrap();
        assert_eq!(payload.title, "Ship report");
        assert_eq!(payload.description, "");
        assert_eq!(payload.status, TaskStatus::Pending);
        assert_eq!(payload.priority, TaskPriority::Medium);
        assert_eq!(
            payload.deadline,
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn accepts_seconds_and_absolute_timestamps() {
        let with_seconds = form("a", "2025-01-01T10:00:30").validate_in(&Utc).unwrap();
        assert_eq!(
            with_seconds.deadline,
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 30).unwrap()
        );

        let absolute = form("a", "2025-01-01T10:00:00+05:00")
            .validate_in(&berlin())
            .unwrap();
        assert_eq!(
            absolute.deadline,
            Utc.with_ymd_and_hms(2025, 1, 1, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_overlong_fields_and_unknown_choices() {
        let long_title = form(&"x".repeat(TITLE_MAX_CHARS + 1), "2025-01-01T10:00");
        assert_eq!(
            long_title.validate_in(&Utc),
            Err(ValidationError::TitleTooLong { max: TITLE_MAX_CHARS })
        );

        let mut long_description = form("a", "2025-01-01T10:00");
        long_description.description = "y".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert_eq!(
            long_description.validate_in(&Utc),
            Err(ValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX_CHARS
            })
        );

        let mut bad_status = form("a", "2025-01-01T10:00");
        bad_status.status = "done".into();
        assert_eq!(
            bad_status.validate_in(&Utc),
            Err(ValidationError::InvalidStatus("done".into()))
        );

        let mut bad_priority = form("a", "2025-01-01T10:00");
        bad_priority.priority = "critical".into();
        assert_eq!(
            bad_priority.validate_in(&Utc),
            Err(ValidationError::InvalidPriority("critical".into()))
        );
    }

    #[test]
    fn form_string_round_trips_to_same_instant() {
        let zones = [
            FixedOffset::east_opt(0).unwrap(),
            berlin(),
            FixedOffset::west_opt(7 * 3600).unwrap(),
            FixedOffset::east_opt(5 * 3600 + 45 * 60).unwrap(),
        ];
        let payload = form("Ship report", "2025-03-30T23:30")
            .validate_in(&Utc)
            .unwrap();

        for tz in zones {
            let raw = to_form_string(&payload.deadline, &tz);
            let again = form("Ship report", &raw).validate_in(&tz).unwrap();
            assert_eq!(again.deadline, payload.deadline, "offset {tz}");
        }
    }

    #[test]
    fn form_string_keeps_seconds_and_fractions() {
        let tz = berlin();
        for raw in ["2025-01-01T10:00:30", "2025-01-01T10:00:30.250Z"] {
            let payload = form("Ship report", raw).validate_in(&tz).unwrap();

            let prefilled = to_form_string(&payload.deadline, &tz);
            let again = form("Ship report", &prefilled).validate_in(&tz).unwrap();

            assert_eq!(again.deadline, payload.deadline, "{raw} -> {prefilled}");
        }

        let whole_minute = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        assert_eq!(to_form_string(&whole_minute, &tz), "2025-01-01T10:00");

        let with_seconds = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 30).unwrap();
        assert_eq!(to_form_string(&with_seconds, &tz), "2025-01-01T10:00:30");
    }

    #[test]
    fn prefill_from_task_validates_back_to_it() {
        let mut stored = task("t1", TaskStatus::InProgress);
        stored.description = "Quarterly numbers".into();
        stored.priority = TaskPriority::Urgent;

        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let prefilled = TaskForm::from_task_in(&stored, &tz);
        assert_eq!(prefilled.deadline, "2025-03-10T09:00");

        let payload = prefilled.validate_in(&tz).unwrap();
        assert_eq!(payload.title, stored.title);
        assert_eq!(payload.description, stored.description);
        assert_eq!(payload.deadline, stored.deadline);
        assert_eq!(payload.status, stored.status);
        assert_eq!(payload.priority, stored.priority);
    }

    #[tokio::test]
    async fn submit_creates_and_edits() {
        let store = Arc::new(FakeTaskStore::with_tasks(vec![task("t1", TaskStatus::Pending)]));
        let controller = TaskFormController::new(store.clone());
        let payload = form("New", "2025-04-01T08:00").validate_in(&Utc).unwrap();

        let created = controller
            .submit_payload(payload.clone(), &FormMode::Create)
            .await
            .unwrap();
        assert_eq!(created.title, "New");
        assert_eq!(store.snapshot().len(), 2);

        let mut edit = payload;
        edit.status = TaskStatus::Completed;
        let updated = controller
            .submit_payload(edit, &FormMode::Edit("t1".into()))
            .await
            .unwrap();
        assert_eq!(updated.id.as_str(), "t1");
        assert_eq!(updated.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn submit_validation_failure_never_reaches_store() {
        let store = Arc::new(FakeTaskStore::default());
        let controller = TaskFormController::new(store.clone());

        let err = controller
            .submit(&form("Ship report", ""), &FormMode::Create)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err, SubmitError::Validation(ValidationError::MissingDeadline));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn submit_remote_failure_keeps_server_message() {
        let store = Arc::new(FakeTaskStore::default());
        store.fail_next(RemoteError::Rejected {
            status: 400,
            message: Some("Title already used".into()),
        });
        let controller = TaskFormController::new(store);
        let payload = form("New", "2025-04-01T08:00").validate_in(&Utc).unwrap();

        let err = controller
            .submit_payload(payload, &FormMode::Create)
            .await
            .unwrap_err();

        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Title already used");
    }

    #[tokio::test]
    async fn load_for_edit_reports_missing_task() {
        let store = Arc::new(FakeTaskStore::with_tasks(vec![task("t1", TaskStatus::Pending)]));
        let controller = TaskFormController::new(store);

        let form = controller.load_for_edit(&"t1".into()).await.unwrap();
        assert_eq!(form.title, "Task t1");

        let err = controller.load_for_edit(&"nope".into()).await.unwrap_err();
        assert_eq!(err, LoadTaskError::Missing("nope".into()));
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn load_for_edit_failure_is_not_a_missing_task() {
        let store = Arc::new(FakeTaskStore::default());
        store.fail_next(RemoteError::NotFound { message: None });
        let controller = TaskFormController::new(store);

        let err = controller.load_for_edit(&"t1".into()).await.unwrap_err();

        assert!(matches!(err, LoadTaskError::Remote(_)));
        assert_eq!(err.to_string(), "Failed to load task. Please try again.");
    }

    #[tokio::test]
    async fn edit_of_deleted_task_shows_server_message() {
        let store = Arc::new(FakeTaskStore::default());
        store.fail_next(RemoteError::NotFound {
            message: Some("Task not found or not owned by you".into()),
        });
        let controller = TaskFormController::new(store);
        let payload = form("Edited", "2025-04-01T08:00").validate_in(&Utc).unwrap();

        let err = controller
            .submit_payload(payload, &FormMode::Edit("gone".into()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Task not found or not owned by you");
    }
}
