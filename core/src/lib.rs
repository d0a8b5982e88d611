pub mod agent;
pub mod api;
pub mod config;
pub mod formatter;
pub mod memory;
pub mod models;
pub mod providers;
pub mod search;
pub mod service;
pub mod tools;
pub mod traits;

pub use agent::{AgentError, AgentExecutor, Executor, ToolRegistry, run_agent};
pub use api::{AppState, create_router};
pub use config::{Config, LlmConfig, MemoryBackend, MemoryConfig, SearchConfig, ServerConfig};
pub use formatter::{Cell, CellKind, Table, table_to_html, text_to_base64};
pub use memory::{
    FileChatHistory, InMemoryChatHistory, SessionStore, WindowMemory, create_store,
};
pub use models::model_tokens_limit;
pub use providers::{AzureOpenAIProvider, create_provider};
pub use search::{BingSearchClient, create_search_client};
pub use service::{ChatService, ExecutorFactory};
pub use tools::{BingSearchResults, BingSearchTool, NO_RESULTS, SearchOutcome};
pub use traits::{
    ChatHistory, ChatMessage, ChatRequest, ChatResponse, ChatTurn, Provider, SearchClient,
    SearchResult, Tool, ToolError, ToolInput, ToolSpec, TurnRole,
};
