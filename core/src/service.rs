//! Per-request assembly of the question-answering agent.

use crate::agent::prompts::{CUSTOM_CHATBOT_PREFIX, CUSTOM_CHATBOT_SUFFIX};
use crate::agent::{AgentExecutor, Executor, ToolRegistry};
use crate::config::Config;
use crate::memory::{SessionStore, WindowMemory, create_store};
use crate::providers::create_provider;
use crate::search::create_search_client;
use crate::tools::BingSearchTool;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds the executor that answers one request for a session.
pub trait ExecutorFactory: Send + Sync {
    fn build(&self, user_id: &str, session_id: &str) -> Result<Box<dyn AgentExecutor>>;
}

/// The production composition: Azure OpenAI chat model, the `@bing` search
/// agent tool and a window memory over the session's stored history.
pub struct ChatService {
    config: Arc<Config>,
    store: SessionStore,
}

impl ChatService {
    pub fn new(config: Arc<Config>) -> Self {
        let store = create_store(&config.memory);
        Self { config, store }
    }

    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = store;
        self
    }

    /// Forget everything stored for a session.
    pub fn reset(&self, user_id: &str, session_id: &str) -> Result<()> {
        self.store
            .open(user_id, session_id)
            .clear()
            .with_context(|| format!("Failed to clear history for {user_id}/{session_id}"))
    }
}

impl ExecutorFactory for ChatService {
    fn build(&self, user_id: &str, session_id: &str) -> Result<Box<dyn AgentExecutor>> {
        let llm = create_provider(&self.config.llm)?;
        let search = create_search_client(&self.config.search)?;

        let www_search = BingSearchTool::new(llm.clone(), search).with_k(self.config.search.k);
        let tools = ToolRegistry::new().with_tool(Arc::new(www_search));
        tracing::debug!(user_id, session_id, tools = ?tools.names(), "assembling executor");

        let history = self.store.open(user_id, session_id);
        history.prepare().with_context(|| {
            format!("Failed to prepare history for {user_id}/{session_id}")
        })?;
        let memory = WindowMemory::new(history, self.config.memory.window);

        let executor = Executor::conversational(llm, tools)
            .with_prefix(CUSTOM_CHATBOT_PREFIX)
            .with_suffix(CUSTOM_CHATBOT_SUFFIX)
            .with_memory(memory);

        Ok(Box::new(executor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChatTurn;
    use tempfile::TempDir;

    fn configured(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.llm.endpoint = "https://acme.openai.azure.com".to_string();
        config.llm.api_key = "key".to_string();
        config.search.subscription_key = "key".to_string();
        config.memory.data_dir = dir.path().to_path_buf();
        config
    }

    #[test]
    fn build_prepares_session_history() {
        let tmp = TempDir::new().unwrap();
        let service = ChatService::new(Arc::new(configured(&tmp)));

        let executor = service.build("u1", "s1").unwrap();
        assert_eq!(executor.llm().deployment(), "gpt-4-32k");
        assert!(tmp.path().join("history").join("u1").join("s1.json").exists());
    }

    #[test]
    fn reset_clears_session_history() {
        let tmp = TempDir::new().unwrap();
        let service = ChatService::new(Arc::new(configured(&tmp)));
        let history = service.store.open("u1", "s1");
        history.prepare().unwrap();
        history.append(ChatTurn::human("remember me")).unwrap();

        service.reset("u1", "s1").unwrap();
        assert!(service.store.open("u1", "s1").last(10).unwrap().is_empty());
    }

    #[test]
    fn build_fails_without_credentials() {
        let tmp = TempDir::new().unwrap();
        let mut config = configured(&tmp);
        config.search.subscription_key.clear();

        let service = ChatService::new(Arc::new(config));
        assert!(service.build("u1", "s1").is_err());
    }
}
