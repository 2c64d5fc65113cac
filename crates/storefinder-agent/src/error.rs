use storefinder_core::SearchRequestError;
use thiserror::Error;

/// Errors raised while running a task on the external browser agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid agent base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unexpected HTTP status {status} from agent {context}")]
    UnexpectedStatus { status: u16, context: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The agent gave up on the task or it was stopped externally.
    #[error("agent task {task_id} ended with status {status}")]
    TaskFailed { task_id: String, status: String },

    #[error("agent task {task_id} finished without output")]
    EmptyOutput { task_id: String },
}

/// Errors from a store search as a whole.
#[derive(Debug, Error)]
pub enum FindError {
    #[error("STOREFINDER_AGENT_API_KEY environment variable not set")]
    MissingCredential,

    #[error(transparent)]
    InvalidRequest(#[from] SearchRequestError),

    #[error("store search failed: {0}")]
    Agent(#[from] AgentError),
}
