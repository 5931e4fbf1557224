//! Task views: the filtered list, status changes, and the create/edit form.

pub mod card;
pub mod dashboard;
pub mod deadline;
pub mod form;
pub mod status;

pub use card::TaskCard;
pub use dashboard::{Confirm, TaskListViewModel};
pub use deadline::{classify, DeadlineUrgency};
pub use form::{FormMode, TaskForm, TaskFormController};
pub use status::StatusUpdateController;
