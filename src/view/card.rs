//! Per-task display state for the list view.

use chrono::{DateTime, TimeZone};
use std::fmt;

use crate::domain::tasks::{Task, TaskPriority, TaskStatus};
use crate::view::deadline::{classify, DeadlineUrgency};

/// A task as rendered at a particular moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard<'a> {
    pub task: &'a Task,
    pub urgency: DeadlineUrgency,
    /// Deadline date in the viewer's timezone, e.g. `Jan 5, 2025`, followed
    /// by a marker when overdue or due today.
    pub deadline_label: String,
}

impl<'a> TaskCard<'a> {
    /// Derive display state for `task` as seen at `now`.
    pub fn new<Tz: TimeZone>(task: &'a Task, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let urgency = classify(&task.deadline, now);
        let date = task
            .deadline
            .with_timezone(&now.timezone())
            .format("%b %-d, %Y");

        Self {
            task,
            urgency,
            deadline_label: format!("{date}{}", deadline_marker(urgency)),
        }
    }

    pub fn status_badge(&self) -> String {
        format!("status-badge status-{}", self.task.status)
    }

    pub fn deadline_badge(&self) -> String {
        format!("deadline-badge deadline-{}", self.urgency)
    }

    pub fn priority_badge(&self) -> String {
        format!("priority-badge priority-{}", self.task.priority)
    }

    pub fn priority_emoji(&self) -> &'static str {
        priority_emoji(self.task.priority)
    }
}

pub fn priority_emoji(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Urgent => "🔴",
        TaskPriority::High => "🟠",
        TaskPriority::Medium => "🟡",
        TaskPriority::Low => "🟢",
    }
}

pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Completed => "Completed",
    }
}

fn deadline_marker(urgency: DeadlineUrgency) -> &'static str {
    match urgency {
        DeadlineUrgency::Overdue => " ⚠️",
        DeadlineUrgency::Today => " 🔔",
        DeadlineUrgency::Soon | DeadlineUrgency::Normal => "",
    }
}

impl fmt::Display for TaskCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} | {} {} | due {}",
            status_label(self.task.status),
            self.task.title,
            self.priority_emoji(),
            self.task.priority,
            self.urgency,
            self.deadline_label,
        )?;
        if !self.task.description.is_empty() {
            write!(f, "\n    {}", self.task.description)?;
        }
        Ok(())
    }
}
