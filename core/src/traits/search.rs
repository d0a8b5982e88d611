use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Web search backend returning up to `count` results for a query.
pub trait SearchClient: Send + Sync {
    fn results(&self, query: &str, count: usize) -> anyhow::Result<Vec<SearchResult>>;
}
