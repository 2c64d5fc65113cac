//! The store search request handler.

use std::sync::Arc;

use storefinder_core::{
    build_task_description, AppConfig, SearchParams, SearchRequest, StoreRecord, TaskOptions,
};
use storefinder_extract::{extract, ExtractionMethod};

use crate::error::FindError;
use crate::runner::AgentRunner;

/// Settings the handler needs from configuration.
#[derive(Clone)]
pub struct FinderSettings {
    pub agent_api_key: Option<String>,
    pub default_radius_km: f64,
    pub max_results: usize,
    pub store_kind: String,
    pub region: Option<String>,
}

impl FinderSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            agent_api_key: config.agent_api_key.clone(),
            default_radius_km: config.default_radius_km,
            max_results: config.max_results,
            store_kind: config.store_kind.clone(),
            region: config.region.clone(),
        }
    }

    fn has_credential(&self) -> bool {
        self.agent_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for FinderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderSettings")
            .field(
                "agent_api_key",
                &self.agent_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("default_radius_km", &self.default_radius_km)
            .field("max_results", &self.max_results)
            .field("store_kind", &self.store_kind)
            .field("region", &self.region)
            .finish()
    }
}

/// Turns a search into an agent task and the agent's answer into store
/// records. Holds no per-request state, so one instance serves concurrent
/// requests.
#[derive(Clone)]
pub struct StoreFinder {
    settings: FinderSettings,
    agent: Arc<dyn AgentRunner>,
}

impl StoreFinder {
    #[must_use]
    pub fn new(settings: FinderSettings, agent: Arc<dyn AgentRunner>) -> Self {
        Self { settings, agent }
    }

    #[must_use]
    pub fn settings(&self) -> &FinderSettings {
        &self.settings
    }

    /// The task description the agent would receive for `request`.
    #[must_use]
    pub fn task_description(&self, request: &SearchRequest) -> String {
        let options = TaskOptions {
            store_kind: &self.settings.store_kind,
            region: self.settings.region.as_deref(),
            radius_km: request
                .search_radius
                .unwrap_or(self.settings.default_radius_km),
            max_results: self.settings.max_results,
        };
        build_task_description(request, &options)
    }

    /// Validates wire-form parameters and runs the search.
    ///
    /// # Errors
    ///
    /// Returns [`FindError::InvalidRequest`] when the parameters do not
    /// describe a usable location or radius, otherwise as
    /// [`StoreFinder::find_stores`].
    pub async fn search(&self, params: SearchParams) -> Result<Vec<StoreRecord>, FindError> {
        let request = params.into_request()?;
        self.find_stores(&request).await
    }

    /// Runs one search on the agent and extracts store records from its
    /// answer. An answer with no recoverable structure still succeeds, with
    /// a single diagnostic record.
    ///
    /// # Errors
    ///
    /// - [`FindError::MissingCredential`] if no agent credential is configured;
    ///   the agent is not called.
    /// - [`FindError::Agent`] if the agent call fails for any reason.
    pub async fn find_stores(&self, request: &SearchRequest) -> Result<Vec<StoreRecord>, FindError> {
        if !self.settings.has_credential() {
            tracing::error!("agent credential missing; refusing store search");
            return Err(FindError::MissingCredential);
        }

        let task = self.task_description(request);
        tracing::info!(
            location = %request.location,
            items = request.desired_items.len(),
            "dispatching store search to browser agent"
        );

        let output = self.agent.run_task(&task).await?;

        let outcome = extract(&output);
        tracing::info!(
            method = outcome.method().map_or("diagnostic", ExtractionMethod::as_str),
            "store search complete"
        );
        Ok(outcome.into_stores())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use storefinder_core::Location;
    use storefinder_extract::AgentOutput;

    use super::*;
    use crate::error::AgentError;

    /// Records the task it was given and answers with a fixed output.
    struct RecordingAgent {
        answer: AgentOutput,
        tasks: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AgentRunner for RecordingAgent {
        async fn run_task(&self, description: &str) -> Result<AgentOutput, AgentError> {
            self.tasks
                .lock()
                .expect("lock")
                .push(description.to_string());
            Ok(self.answer.clone())
        }
    }

    fn settings(key: Option<&str>) -> FinderSettings {
        FinderSettings {
            agent_api_key: key.map(ToString::to_string),
            default_radius_km: 5.0,
            max_results: 5,
            store_kind: "cannabis dispensaries".to_string(),
            region: None,
        }
    }

    fn request(radius: Option<f64>) -> SearchRequest {
        SearchRequest {
            location: Location::PostalCode("V6B 1A1".to_string()),
            desired_items: vec!["Blue Dream".to_string()],
            search_radius: radius,
        }
    }

    #[test]
    fn task_description_uses_default_radius() {
        let agent = Arc::new(RecordingAgent {
            answer: AgentOutput::Text(String::new()),
            tasks: Mutex::new(Vec::new()),
        });
        let finder = StoreFinder::new(settings(Some("key")), agent);
        assert!(finder.task_description(&request(None)).contains("within 5 km"));
        assert!(finder
            .task_description(&request(Some(20.0)))
            .contains("within 20 km"));
    }

    #[tokio::test]
    async fn find_stores_sends_task_and_extracts_answer() {
        let agent = Arc::new(RecordingAgent {
            answer: AgentOutput::Text("```json\n[{\"name\": \"Green Leaf\"}]\n```".to_string()),
            tasks: Mutex::new(Vec::new()),
        });
        let finder = StoreFinder::new(settings(Some("key")), agent.clone());

        let stores = finder.find_stores(&request(None)).await.expect("stores");
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name(), "Green Leaf");

        let tasks = agent.tasks.lock().expect("lock");
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].contains("Blue Dream"));
    }

    #[tokio::test]
    async fn missing_credential_never_calls_agent() {
        let agent = Arc::new(RecordingAgent {
            answer: AgentOutput::Text("[]".to_string()),
            tasks: Mutex::new(Vec::new()),
        });
        let finder = StoreFinder::new(settings(Some("  ")), agent.clone());

        let err = finder.find_stores(&request(None)).await.unwrap_err();
        assert!(matches!(err, FindError::MissingCredential));
        assert!(agent.tasks.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn search_rejects_params_without_location() {
        let agent = Arc::new(RecordingAgent {
            answer: AgentOutput::Text("[]".to_string()),
            tasks: Mutex::new(Vec::new()),
        });
        let finder = StoreFinder::new(settings(Some("key")), agent);

        let err = finder.search(SearchParams::default()).await.unwrap_err();
        assert!(matches!(err, FindError::InvalidRequest(_)));
    }

    #[test]
    fn settings_debug_redacts_key() {
        let debug = format!("{:?}", settings(Some("bu-secret")));
        assert!(!debug.contains("bu-secret"));
    }
}
