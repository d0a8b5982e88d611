use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: Option<String>,
}

impl ChatResponse {
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub stop: Option<&'a [String]>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            stop: None,
        }
    }
}

/// A chat-completion client bound to one model deployment.
///
/// Calls are blocking; the HTTP layer moves agent work onto the blocking
/// pool before any provider is touched.
pub trait Provider: Send + Sync {
    fn deployment(&self) -> &str;

    fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse>;

    /// Single-prompt completion, used for the reformatting pass.
    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let messages = [ChatMessage::user(prompt)];
        let response = self.chat(ChatRequest::new(&messages))?;
        Ok(response.text_or_empty().to_string())
    }
}
