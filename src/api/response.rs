//! Task service response bodies

use serde::Deserialize;

use crate::domain::tasks::Task;

/// Body of `GET tasks`
#[derive(Debug, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Body of `POST tasks` and `PUT tasks/{id}`
#[derive(Debug, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    /// The server's explanation: `message` if present, else the joined
    /// `errors` list.
    pub fn into_message(self) -> Option<String> {
        if let Some(message) = self.message.filter(|m| !m.trim().is_empty()) {
            return Some(message);
        }

        self.errors
            .filter(|errors| !errors.is_empty())
            .map(|errors| errors.join(", "))
    }

    /// Extract a message from a raw error body, which may be JSON or plain
    /// text.
    pub fn message_from_body(body: &str) -> Option<String> {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => parsed.into_message(),
            Err(_) => {
                let text = body.trim();
                (!text.is_empty() && !text.starts_with('<')).then(|| text.to_string())
            }
        }
    }
}
