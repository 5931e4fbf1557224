//! Task service client.
//!
//! [`RemoteTaskStore`] is the seam the views talk to; [`HttpTaskStore`] is the
//! JSON-over-HTTP implementation used by the binary. Calls are never retried.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::api::{ErrorResponse, TaskListResponse, TaskResponse};
use crate::config::Settings;
use crate::domain::tasks::{Task, TaskId, TaskPayload, TaskUpdate};
use crate::error::RemoteError;

/// Source of truth for tasks.
#[async_trait]
pub trait RemoteTaskStore: Send + Sync {
    /// `GET tasks`
    async fn list_tasks(&self) -> Result<Vec<Task>, RemoteError>;

    /// `POST tasks`
    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, RemoteError>;

    /// `PUT tasks/{id}` with a full or partial body.
    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, RemoteError>;

    /// `DELETE tasks/{id}`
    async fn delete_task(&self, id: &TaskId) -> Result<(), RemoteError>;
}

/// HTTP client for the task service.
#[derive(Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTaskStore {
    /// Create a new task service client.
    pub fn new(base_url: Url, token: Option<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = %base_url, "Task service client initialized");

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.api_url.clone(),
            settings.api_token.clone(),
            settings.api_timeout_seconds,
        )
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        let request_id = Uuid::new_v4().to_string();

        debug!(%method, url = %url, request_id = %request_id, "Task service request");

        let req = self
            .client
            .request(method, url)
            .header("x-request-id", request_id);

        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and decode a successful JSON body.
    async fn send<R: DeserializeOwned>(&self, req: RequestBuilder) -> Result<R, RemoteError> {
        let response = self.execute(req).await?;

        response.json::<R>().await.map_err(|e| {
            error!(error = %e, "Failed to parse task service response");
            RemoteError::InvalidResponse(e.to_string())
        })
    }

    /// Send a request, mapping transport failures and non-2xx statuses.
    async fn execute(&self, req: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = req.send().await.map_err(|e| {
            error!(error = %e, "Task service request failed");
            RemoteError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = ErrorResponse::message_from_body(&body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(status = %status, message = ?message, "Task service rejected credentials");
                Err(RemoteError::Unauthorized { message })
            }
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound { message }),
            _ => {
                warn!(status = %status, message = ?message, "Task service error");
                Err(RemoteError::Rejected {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl RemoteTaskStore for HttpTaskStore {
    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, RemoteError> {
        let body: TaskListResponse = self.send(self.request(Method::GET, &["tasks"])).await?;
        Ok(body.tasks)
    }

    #[instrument(skip(self, payload))]
    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, RemoteError> {
        let req = self.request(Method::POST, &["tasks"]).json(payload);
        let body: TaskResponse = self.send(req).await?;
        Ok(body.task)
    }

    #[instrument(skip(self, update))]
    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, RemoteError> {
        let req = self
            .request(Method::PUT, &["tasks", id.as_str()])
            .json(update);
        let body: TaskResponse = self.send(req).await?;
        Ok(body.task)
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &TaskId) -> Result<(), RemoteError> {
        self.execute(self.request(Method::DELETE, &["tasks", id.as_str()]))
            .await?;
        Ok(())
    }
}
