//! Wire types for the hosted browser-agent task API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct RunTaskRequest<'a> {
    pub task: &'a str,
    pub llm_model: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RunTaskResponse {
    pub id: String,
}

/// Lifecycle state of a task as reported by the agent API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Running,
    Paused,
    Finished,
    Failed,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Whether the task will not make further progress.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Stopped)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskDetails {
    pub status: TaskStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
}
