use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(invalid(var, "must be at least 1".to_string())),
            Ok(value) => Ok(value),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(var, format!("must be a positive number, got {raw}")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"));

    let bind_addr = or_default("STOREFINDER_BIND_ADDR", "0.0.0.0:5001")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFINDER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");

    let agent_api_key = optional("STOREFINDER_AGENT_API_KEY");
    let agent_base_url = or_default(
        "STOREFINDER_AGENT_BASE_URL",
        "https://api.browser-use.com/api/v1",
    );
    if !agent_base_url.starts_with("http://") && !agent_base_url.starts_with("https://") {
        return Err(invalid(
            "STOREFINDER_AGENT_BASE_URL",
            format!("expected an http(s) URL, got {agent_base_url}"),
        ));
    }
    let agent_model = or_default("STOREFINDER_AGENT_MODEL", "gpt-4o");
    let agent_poll_interval_ms = parse_u64("STOREFINDER_AGENT_POLL_INTERVAL_MS", "2000")?;
    let agent_request_timeout_secs = parse_u64("STOREFINDER_AGENT_REQUEST_TIMEOUT_SECS", "30")?;

    let default_radius_km = parse_positive_f64("STOREFINDER_DEFAULT_RADIUS_KM", "5")?;
    let max_results = parse_positive_usize("STOREFINDER_MAX_RESULTS", "5")?;
    let store_kind = or_default("STOREFINDER_STORE_KIND", "cannabis dispensaries");
    let region = optional("STOREFINDER_REGION");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        agent_api_key,
        agent_base_url,
        agent_model,
        agent_poll_interval_ms,
        agent_request_timeout_secs,
        default_radius_km,
        max_results,
        store_kind,
        region,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
