use crate::config::SearchConfig;
use crate::traits::{SearchClient, SearchResult};
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages")]
    web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingWebPage>,
}

#[derive(Debug, Deserialize)]
struct BingWebPage {
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
}

impl BingResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.web_pages
            .map(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .map(|page| SearchResult {
                title: page.name,
                link: page.url,
                snippet: page.snippet,
            })
            .collect()
    }
}

/// Bing Web Search v7 client.
pub struct BingSearchClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    subscription_key: String,
}

impl BingSearchClient {
    pub fn new(subscription_key: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: "https://api.bing.microsoft.com".to_string(),
            subscription_key: subscription_key.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    fn search_url(&self) -> String {
        format!("{}/v7.0/search", self.endpoint.trim_end_matches('/'))
    }
}

impl SearchClient for BingSearchClient {
    fn results(&self, query: &str, count: usize) -> Result<Vec<SearchResult>> {
        let count_param = count.to_string();
        let response = self
            .client
            .get(self.search_url())
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .query(&[
                ("q", query),
                ("count", count_param.as_str()),
                ("textDecorations", "true"),
                ("textFormat", "HTML"),
            ])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(anyhow!("Bing search error {}: {}", status, error_text));
        }

        let body: BingResponse = response.json()?;
        let mut results = body.into_results();
        results.truncate(count);
        Ok(results)
    }
}

pub fn create_search_client(config: &SearchConfig) -> Result<Arc<dyn SearchClient>> {
    if config.subscription_key.is_empty() {
        return Err(anyhow!(
            "No Bing subscription key found. Set search.subscription_key or BING_SUBSCRIPTION_KEY"
        ));
    }

    let client = BingSearchClient::new(config.subscription_key.clone())
        .with_endpoint(config.endpoint.clone())
        .with_timeout(Duration::from_secs(config.timeout_secs));

    Ok(Arc::new(client))
}
