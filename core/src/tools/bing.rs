//! Web search exposed to agents as the `@bing` tool.
//!
//! [`BingSearchResults`] hands raw results back to the calling agent.
//! [`BingSearchTool`] instead spins up its own ReAct sub-agent over
//! `BingSearchResults` and returns that agent's written answer, which is
//! what the conversational agent of the service registers.

use crate::agent::prompts::BING_PROMPT_PREFIX;
use crate::agent::{AgentExecutor, Executor, ToolRegistry, run_agent};
use crate::traits::{Provider, SearchClient, SearchResult, Tool, ToolError, ToolInput};
use std::sync::Arc;
use tracing::{error, warn};

pub const BING_TOOL_NAME: &str = "@bing";
pub const BING_TOOL_DESCRIPTION: &str = "useful when the questions includes the term: @bing.\n";
pub const NO_RESULTS: &str = "No Results Found";
pub const DEFAULT_K: usize = 5;

const SUB_AGENT_ATTEMPTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<SearchResult>),
    /// The search backend failed; distinct from an empty result list.
    Unavailable,
}

impl SearchOutcome {
    pub fn render(&self) -> String {
        match self {
            Self::Found(results) => {
                serde_json::to_string(results).unwrap_or_else(|_| NO_RESULTS.to_string())
            }
            Self::Unavailable => NO_RESULTS.to_string(),
        }
    }
}

pub struct BingSearchResults {
    client: Arc<dyn SearchClient>,
    k: usize,
}

impl BingSearchResults {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            k: DEFAULT_K,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        match self.client.results(query, self.k) {
            Ok(results) => SearchOutcome::Found(results),
            Err(e) => {
                warn!(error = %e, "bing search failed");
                SearchOutcome::Unavailable
            }
        }
    }
}

impl Tool for BingSearchResults {
    fn name(&self) -> &str {
        BING_TOOL_NAME
    }

    fn description(&self) -> &str {
        BING_TOOL_DESCRIPTION
    }

    fn run(&self, input: &ToolInput) -> Result<String, ToolError> {
        let query = input.normalize()?;
        Ok(self.search(&query).render())
    }
}

pub struct BingSearchTool {
    llm: Arc<dyn Provider>,
    client: Arc<dyn SearchClient>,
    k: usize,
}

impl BingSearchTool {
    pub fn new(llm: Arc<dyn Provider>, client: Arc<dyn SearchClient>) -> Self {
        Self {
            llm,
            client,
            k: DEFAULT_K,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    fn sub_agent(&self) -> Executor {
        let search = BingSearchResults::new(self.client.clone()).with_k(self.k);
        let tools = ToolRegistry::new().with_tool(Arc::new(search));
        Executor::zero_shot(self.llm.clone(), tools).with_prefix(BING_PROMPT_PREFIX)
    }

    fn answer(&self, input: &ToolInput) -> Result<String, ToolError> {
        let query = input.normalize()?;
        let agent = self.sub_agent();
        Ok(answer_with_retry(&query, &agent))
    }
}

/// Up to two sub-agent runs. A failed run's error text stands in as the
/// answer when no run succeeds.
fn answer_with_retry(query: &str, agent: &dyn AgentExecutor) -> String {
    let mut response = String::new();

    for attempt in 1..=SUB_AGENT_ATTEMPTS {
        match run_agent(query, agent) {
            Ok(answer) => return answer,
            Err(e) => {
                warn!(attempt, error = %e, "search sub-agent failed");
                response = e.to_string();
            }
        }
    }

    response
}

impl Tool for BingSearchTool {
    fn name(&self) -> &str {
        BING_TOOL_NAME
    }

    fn description(&self) -> &str {
        BING_TOOL_DESCRIPTION
    }

    fn return_direct(&self) -> bool {
        true
    }

    fn run(&self, input: &ToolInput) -> Result<String, ToolError> {
        self.answer(input).map_err(|e| {
            error!(error = %e, "bing search tool could not run");
            ToolError::NoAnswer(BING_TOOL_NAME.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ChatRequest, ChatResponse};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSearch;

    impl SearchClient for FailingSearch {
        fn results(&self, _query: &str, _count: usize) -> anyhow::Result<Vec<SearchResult>> {
            Err(anyhow::anyhow!("401 Unauthorized"))
        }
    }

    struct FixedSearch {
        calls: AtomicUsize,
    }

    impl SearchClient for FixedSearch {
        fn results(&self, query: &str, count: usize) -> anyhow::Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..count.min(2))
                .map(|i| SearchResult {
                    title: format!("{query} {i}"),
                    link: format!("https://example.com/{i}"),
                    snippet: "snippet".to_string(),
                })
                .collect())
        }
    }

    struct Scripted(Mutex<VecDeque<anyhow::Result<String>>>);

    impl Scripted {
        fn new(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(replies.into())))
        }
    }

    impl Provider for Scripted {
        fn deployment(&self) -> &str {
            "scripted"
        }

        fn chat(&self, _request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
            let reply = self
                .0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))?;
            Ok(ChatResponse { text: Some(reply) })
        }
    }

    #[test]
    fn primitive_swallows_search_errors() {
        let tool = BingSearchResults::new(Arc::new(FailingSearch));
        assert_eq!(tool.search("anything"), SearchOutcome::Unavailable);
        assert_eq!(tool.run(&"anything".into()).unwrap(), "No Results Found");
    }

    #[test]
    fn primitive_serializes_results() {
        let tool = BingSearchResults::new(Arc::new(FixedSearch {
            calls: AtomicUsize::new(0),
        }));
        let output = tool.run(&"rust".into()).unwrap();
        let parsed: Vec<SearchResult> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "rust 0");
    }

    #[test]
    fn primitive_empty_results_are_not_unavailable() {
        let tool = BingSearchResults::new(Arc::new(FixedSearch {
            calls: AtomicUsize::new(0),
        }))
        .with_k(0);
        assert_eq!(tool.search("x"), SearchOutcome::Found(vec![]));
        assert_eq!(tool.run(&"x".into()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn async_paths_are_unsupported() {
        let primitive = BingSearchResults::new(Arc::new(FailingSearch));
        let composite = BingSearchTool::new(Scripted::new(vec![]), Arc::new(FailingSearch));

        assert_eq!(
            primitive.arun(&"q".into()).await,
            Err(ToolError::AsyncUnsupported("@bing".into()))
        );
        assert!(matches!(
            composite.arun(&"q".into()).await,
            Err(ToolError::AsyncUnsupported(_))
        ));
    }

    #[test]
    fn composite_answers_through_sub_agent() {
        let search = Arc::new(FixedSearch {
            calls: AtomicUsize::new(0),
        });
        let llm = Scripted::new(vec![
            Ok(" I should search.\nAction: @bing\nAction Input: rust".to_string()),
            Ok(" I now know the final answer\nFinal Answer: Rust is a language.".to_string()),
        ]);
        let tool = BingSearchTool::new(llm, search.clone());

        let answer = tool
            .run(&ToolInput::from(json!({"query": "what is rust"})))
            .unwrap();
        assert_eq!(answer, "Rust is a language.");
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
        assert!(tool.return_direct());
    }

    #[test]
    fn composite_returns_error_text_after_two_failures() {
        let llm = Scripted::new(vec![
            Err(anyhow::anyhow!("connection reset")),
            Err(anyhow::anyhow!("connection reset again")),
        ]);
        let tool = BingSearchTool::new(llm, Arc::new(FailingSearch));

        let answer = tool.run(&"q".into()).unwrap();
        assert_eq!(answer, "LLM request failed: connection reset again");
    }

    #[test]
    fn composite_construction_failure_is_no_answer() {
        let tool = BingSearchTool::new(Scripted::new(vec![]), Arc::new(FailingSearch));
        let input = ToolInput::from(json!({"a": 1, "b": 2}));
        assert_eq!(tool.run(&input), Err(ToolError::NoAnswer("@bing".into())));
    }
}
