//! HTTP client for a hosted browser-agent task API.
//!
//! A task is created with `POST run-task`, polled with `GET task/{id}` until
//! it reaches a terminal status, and then released with `PUT stop-task`.
//! Each task holds a browser session on the provider side, so the release
//! call is made on every exit path once the task exists, including when the
//! caller drops the future mid-poll.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use storefinder_core::AppConfig;
use storefinder_extract::AgentOutput;

use crate::error::AgentError;
use crate::runner::AgentRunner;
use crate::types::{RunTaskRequest, RunTaskResponse, TaskDetails, TaskStatus};

const DEFAULT_BASE_URL: &str = "https://api.browser-use.com/api/v1";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Client for the browser-agent task API.
///
/// Use [`BrowserAgentClient::new`] for the hosted service or
/// [`BrowserAgentClient::with_base_url`] to point at a mock server in tests.
pub struct BrowserAgentClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    poll_interval: Duration,
}

impl BrowserAgentClient {
    /// Creates a client for the hosted agent service.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AgentError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AgentError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("storefinder/0.1 (store-search)")
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| AgentError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Builds a client from application configuration. A missing credential
    /// yields a client with an empty key; callers check for the credential
    /// before running tasks.
    ///
    /// # Errors
    ///
    /// Same as [`BrowserAgentClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, AgentError> {
        let client = Self::with_base_url(
            config.agent_api_key.as_deref().unwrap_or_default(),
            &config.agent_model,
            config.agent_request_timeout_secs,
            &config.agent_base_url,
        )?;
        Ok(client.with_poll_interval(Duration::from_millis(config.agent_poll_interval_ms)))
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Starts a task and returns its ID.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Http`] on network failure.
    /// - [`AgentError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AgentError::Deserialize`] if the response has no task ID.
    pub async fn create_task(&self, description: &str) -> Result<String, AgentError> {
        let body = RunTaskRequest {
            task: description,
            llm_model: &self.model,
        };
        let request = self.client.post(self.url("run-task")).json(&body);
        let value = self.send_json(request, "run-task").await?;

        let created: RunTaskResponse =
            serde_json::from_value(value).map_err(|e| AgentError::Deserialize {
                context: "run-task".to_string(),
                source: e,
            })?;
        Ok(created.id)
    }

    /// Fetches the current state of a task.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Http`] on network failure.
    /// - [`AgentError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AgentError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_task(&self, task_id: &str) -> Result<TaskDetails, AgentError> {
        let request = self.client.get(self.url(&format!("task/{task_id}")));
        let value = self.send_json(request, "task").await?;

        serde_json::from_value(value).map_err(|e| AgentError::Deserialize {
            context: format!("task(id={task_id})"),
            source: e,
        })
    }

    /// Releases the browser session held by a task.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Http`] on network failure.
    /// - [`AgentError::UnexpectedStatus`] on a non-2xx response.
    pub async fn stop_task(&self, task_id: &str) -> Result<(), AgentError> {
        let response = self
            .client
            .put(self.url("stop-task"))
            .query(&[("task_id", task_id)])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::UnexpectedStatus {
                status: status.as_u16(),
                context: "stop-task".to_string(),
            });
        }
        Ok(())
    }

    /// Polls a task until it reaches a terminal status.
    async fn wait_for_output(&self, task_id: &str) -> Result<AgentOutput, AgentError> {
        loop {
            let details = self.get_task(task_id).await?;
            match details.status {
                TaskStatus::Finished => return output_from(task_id, details.output),
                TaskStatus::Failed | TaskStatus::Stopped => {
                    return Err(AgentError::TaskFailed {
                        task_id: task_id.to_owned(),
                        status: details.status.as_str().to_owned(),
                    });
                }
                status => {
                    tracing::trace!(task_id, status = status.as_str(), "agent task in progress");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn send_json(&self, request: RequestBuilder, context: &str) -> Result<Value, AgentError> {
        let response = request.bearer_auth(&self.api_key).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_owned(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

/// Releases a task's session if the future driving it is dropped before the
/// task is stopped normally, e.g. when the HTTP client disconnects.
struct SessionGuard {
    client: Client,
    stop_url: String,
    api_key: String,
    task_id: String,
    armed: bool,
}

impl SessionGuard {
    fn new(agent: &BrowserAgentClient, task_id: &str) -> Self {
        Self {
            client: agent.client.clone(),
            stop_url: agent.url("stop-task"),
            api_key: agent.api_key.clone(),
            task_id: task_id.to_owned(),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let task_id = std::mem::take(&mut self.task_id);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(task_id, "no runtime to release abandoned browser agent session");
            return;
        };
        let request = self
            .client
            .put(&self.stop_url)
            .query(&[("task_id", task_id.as_str())])
            .bearer_auth(&self.api_key);

        tracing::warn!(task_id, "agent task abandoned; releasing browser session");
        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => tracing::warn!(
                    task_id,
                    status = response.status().as_u16(),
                    "failed to release abandoned browser agent session"
                ),
                Err(error) => tracing::warn!(
                    task_id,
                    error = %error,
                    "failed to release abandoned browser agent session"
                ),
            }
        });
    }
}

#[async_trait]
impl AgentRunner for BrowserAgentClient {
    async fn run_task(&self, description: &str) -> Result<AgentOutput, AgentError> {
        let task_id = self.create_task(description).await?;
        tracing::info!(task_id, model = %self.model, "browser agent task started");

        let mut guard = SessionGuard::new(self, &task_id);
        let result = self.wait_for_output(&task_id).await;

        if let Err(error) = self.stop_task(&task_id).await {
            tracing::warn!(task_id, error = %error, "failed to release browser agent session");
        }
        guard.disarm();

        match &result {
            Ok(_) => tracing::info!(task_id, "browser agent task finished"),
            Err(error) => tracing::error!(task_id, error = %error, "browser agent task failed"),
        }
        result
    }
}

fn output_from(task_id: &str, output: Option<Value>) -> Result<AgentOutput, AgentError> {
    match output {
        None | Some(Value::Null) => Err(AgentError::EmptyOutput {
            task_id: task_id.to_owned(),
        }),
        Some(value) => Ok(AgentOutput::from_value(value)),
    }
}
