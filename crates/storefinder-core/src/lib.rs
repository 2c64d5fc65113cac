pub mod app_config;
pub mod config;
pub mod records;
pub mod search;
pub mod task;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{InventoryItem, StoreRecord};
pub use search::{Location, SearchParams, SearchRequest, SearchRequestError};
pub use task::{build_task_description, describe_items, TaskOptions};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
