pub mod memory;
pub mod provider;
pub mod search;
pub mod tool;

pub use memory::{ChatHistory, ChatTurn, TurnRole};
pub use provider::{ChatMessage, ChatRequest, ChatResponse, Provider};
pub use search::{SearchClient, SearchResult};
pub use tool::{Tool, ToolError, ToolInput, ToolSpec};
