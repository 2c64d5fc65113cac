pub mod client;
pub mod error;
pub mod finder;
pub mod runner;
pub mod types;

pub use client::BrowserAgentClient;
pub use error::{AgentError, FindError};
pub use finder::{FinderSettings, StoreFinder};
pub use runner::AgentRunner;
pub use storefinder_extract::AgentOutput;
