use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys checked, in order, when a structured input is reduced to a query.
const QUERY_KEYS: &[&str] = &["query", "q", "input", "tool_input", "__arg1"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("{0} does not support async")]
    AsyncUnsupported(String),
    #[error("invalid tool input: {0}")]
    InvalidInput(String),
    #[error("{0} returned no answer")]
    NoAnswer(String),
}

/// Input handed to a tool: a bare query or a structured request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolInput {
    Query(String),
    Structured(Map<String, Value>),
}

impl ToolInput {
    /// Reduce the input to the single query string a tool acts on.
    pub fn normalize(&self) -> Result<String, ToolError> {
        match self {
            Self::Query(query) => Ok(query.clone()),
            Self::Structured(fields) => {
                if let Some(query) = QUERY_KEYS
                    .iter()
                    .find_map(|key| fields.get(*key).and_then(Value::as_str))
                {
                    return Ok(query.to_string());
                }

                let mut strings = fields.values().filter_map(Value::as_str);
                match (strings.next(), strings.next()) {
                    (Some(only), None) => Ok(only.to_string()),
                    _ => Err(ToolError::InvalidInput(format!(
                        "no query field in {}",
                        Value::Object(fields.clone())
                    ))),
                }
            }
        }
    }
}

impl From<&str> for ToolInput {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for ToolInput {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<Value> for ToolInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Query(s),
            Value::Object(map) => Self::Structured(map),
            other => Self::Query(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// When set, the executor ends the run with this tool's output.
    fn return_direct(&self) -> bool {
        false
    }

    fn run(&self, input: &ToolInput) -> Result<String, ToolError>;

    async fn arun(&self, _input: &ToolInput) -> Result<String, ToolError> {
        Err(ToolError::AsyncUnsupported(self.name().to_string()))
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}
