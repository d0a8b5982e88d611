use crate::traits::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The model replied in a shape the agent could not decode.
    #[error("Could not parse LLM output: `{0}`")]
    OutputParse(String),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("Agent stopped after {0} iterations without a final answer")]
    IterationLimit(usize),
    #[error("LLM request failed: {0:#}")]
    Llm(anyhow::Error),
    #[error("Conversation memory failed: {0:#}")]
    Memory(anyhow::Error),
}
