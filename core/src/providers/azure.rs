use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct AzureRequest<'a> {
    messages: Vec<AzureMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct AzureMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AzureResponse {
    choices: Vec<AzureChoice>,
}

#[derive(Debug, Deserialize)]
struct AzureChoice {
    message: AzureResponseMessage,
}

#[derive(Debug, Deserialize)]
struct AzureResponseMessage {
    content: Option<String>,
}

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureOpenAIProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    deployment: String,
    temperature: f64,
    max_tokens: u32,
}

impl AzureOpenAIProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: build_client(Duration::from_secs(120), Duration::from_secs(30)),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: "2023-05-15".to_string(),
            deployment: "gpt-4-32k".to_string(),
            temperature: 0.5,
            max_tokens: 1000,
        }
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.client = build_client(request, connect);
        self
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    fn convert_messages<'a>(&self, messages: &'a [ChatMessage]) -> Vec<AzureMessage<'a>> {
        messages
            .iter()
            .map(|m| AzureMessage {
                role: &m.role,
                content: &m.content,
            })
            .collect()
    }
}

fn build_client(request: Duration, connect: Duration) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(request)
        .connect_timeout(connect)
        .build()
        .unwrap_or_default()
}

impl Provider for AzureOpenAIProvider {
    fn deployment(&self) -> &str {
        &self.deployment
    }

    fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let body = AzureRequest {
            messages: self.convert_messages(request.messages),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: request.stop.filter(|s| !s.is_empty()),
        };

        tracing::debug!(
            deployment = %self.deployment,
            messages = request.messages.len(),
            "chat completion request"
        );

        let response = self
            .client
            .post(self.chat_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Azure OpenAI API error {}: {}",
                status,
                error_text
            ));
        }

        let azure_response: AzureResponse = response.json()?;

        let choice = azure_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

        Ok(ChatResponse {
            text: choice.message.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_uses_deployment_and_version() {
        let provider = AzureOpenAIProvider::new("https://acme.openai.azure.com/", "key")
            .with_deployment("gpt-4")
            .with_api_version("2024-02-01");
        assert_eq!(
            provider.chat_url(),
            "https://acme.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn request_omits_empty_stop() {
        let body = AzureRequest {
            messages: vec![AzureMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.5,
            max_tokens: 1000,
            stop: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("stop").is_none());
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn response_without_content() {
        let parsed: AzureResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
