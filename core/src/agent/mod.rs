pub mod error;
pub mod executor;
pub mod prompts;
pub mod registry;
pub mod runner;
pub mod strategy;

pub use error::AgentError;
pub use executor::{AgentExecutor, Executor};
pub use registry::ToolRegistry;
pub use runner::{MAX_PARSE_ATTEMPTS, run_agent};
pub use strategy::{AgentAction, AgentPrompt, Strategy};
