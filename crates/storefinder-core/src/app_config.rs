use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Bearer credential for the hosted browser agent. Absence is reported
    /// per request rather than at startup.
    pub agent_api_key: Option<String>,
    pub agent_base_url: String,
    /// Language model the browser agent drives.
    pub agent_model: String,
    pub agent_poll_interval_ms: u64,
    pub agent_request_timeout_secs: u64,
    /// Radius used when a search request does not carry one.
    pub default_radius_km: f64,
    /// How many stores the agent is asked to return.
    pub max_results: usize,
    /// Kind of store the agent looks for, e.g. `"cannabis dispensaries"`.
    pub store_kind: String,
    pub region: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn has_agent_credential(&self) -> bool {
        self.agent_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "agent_api_key",
                &self.agent_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("agent_base_url", &self.agent_base_url)
            .field("agent_model", &self.agent_model)
            .field("agent_poll_interval_ms", &self.agent_poll_interval_ms)
            .field(
                "agent_request_timeout_secs",
                &self.agent_request_timeout_secs,
            )
            .field("default_radius_km", &self.default_radius_km)
            .field("max_results", &self.max_results)
            .field("store_kind", &self.store_kind)
            .field("region", &self.region)
            .finish()
    }
}
