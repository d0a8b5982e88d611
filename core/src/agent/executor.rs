use crate::agent::strategy::{AgentAction, AgentPrompt, Step, Strategy};
use crate::agent::{AgentError, ToolRegistry};
use crate::memory::WindowMemory;
use crate::traits::{ChatRequest, Provider, ToolError};
use std::sync::Arc;
use tracing::{debug, warn};

const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Something that turns a question into an answer, possibly failing with a
/// parse error the caller can repair using `llm()`.
pub trait AgentExecutor: Send + Sync {
    fn run(&self, input: &str) -> Result<String, AgentError>;

    fn llm(&self) -> Arc<dyn Provider>;
}

pub struct Executor {
    llm: Arc<dyn Provider>,
    strategy: Strategy,
    prompt: AgentPrompt,
    tools: ToolRegistry,
    memory: Option<WindowMemory>,
    max_iterations: usize,
}

impl Executor {
    pub fn new(llm: Arc<dyn Provider>, strategy: Strategy, tools: ToolRegistry) -> Self {
        Self {
            llm,
            strategy,
            prompt: strategy.default_prompt(),
            tools,
            memory: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn conversational(llm: Arc<dyn Provider>, tools: ToolRegistry) -> Self {
        Self::new(llm, Strategy::ConversationalChat, tools)
    }

    pub fn zero_shot(llm: Arc<dyn Provider>, tools: ToolRegistry) -> Self {
        Self::new(llm, Strategy::ZeroShotReact, tools)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.prompt.suffix = suffix.into();
        self
    }

    pub fn with_memory(mut self, memory: WindowMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    fn remember(&self, input: &str, output: &str) -> Result<(), AgentError> {
        if let Some(memory) = &self.memory {
            memory.save(input, output).map_err(AgentError::Memory)?;
        }
        Ok(())
    }
}

impl AgentExecutor for Executor {
    fn run(&self, input: &str) -> Result<String, AgentError> {
        let history = match &self.memory {
            Some(memory) => memory.load().map_err(AgentError::Memory)?,
            None => Vec::new(),
        };
        let specs = self.tools.get_specs();
        let stop = self.strategy.stop_sequences();
        let mut steps: Vec<Step> = Vec::new();

        for iteration in 1..=self.max_iterations {
            let messages = self
                .strategy
                .build_messages(&self.prompt, &specs, &history, input, &steps);
            let request = ChatRequest {
                messages: &messages,
                stop: stop.as_deref(),
            };

            let response = self.llm.chat(request).map_err(AgentError::Llm)?;
            let text = response.text_or_empty();
            debug!(iteration, strategy = ?self.strategy, "agent step");

            match self.strategy.parse(text)? {
                AgentAction::Finish(answer) => {
                    self.remember(input, &answer)?;
                    return Ok(answer);
                }
                AgentAction::Tool {
                    name,
                    input: tool_input,
                    log,
                } => {
                    let Some(tool) = self.tools.get(&name) else {
                        warn!(tool = %name, "agent picked an unknown tool");
                        steps.push(Step {
                            log,
                            observation: format!("{name} is not a valid tool, try another one."),
                        });
                        continue;
                    };

                    let observation = match tool.run(&tool_input) {
                        Ok(output) => output,
                        Err(err @ ToolError::NoAnswer(_)) => return Err(err.into()),
                        Err(err) => err.to_string(),
                    };

                    if tool.return_direct() {
                        self.remember(input, &observation)?;
                        return Ok(observation);
                    }

                    steps.push(Step { log, observation });
                }
            }
        }

        Err(AgentError::IterationLimit(self.max_iterations))
    }

    fn llm(&self) -> Arc<dyn Provider> {
        self.llm.clone()
    }
}
