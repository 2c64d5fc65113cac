use async_trait::async_trait;
use storefinder_extract::AgentOutput;

use crate::error::AgentError;

/// The one thing this service needs from an autonomous browsing agent:
/// run a natural-language task and hand back whatever it answered.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run_task(&self, description: &str) -> Result<AgentOutput, AgentError>;
}
