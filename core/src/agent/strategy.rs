//! How an agent talks to its model: prompt layout per turn and decoding
//! of the reply into a tool call or a final answer.

use crate::agent::AgentError;
use crate::agent::prompts::{
    BING_PROMPT_PREFIX, CONVERSATIONAL_FORMAT_INSTRUCTIONS, CONVERSATIONAL_TOOL_RESPONSE,
    CUSTOM_CHATBOT_PREFIX, CUSTOM_CHATBOT_SUFFIX, REACT_FORMAT_INSTRUCTIONS, REACT_SUFFIX,
};
use crate::traits::{ChatMessage, ToolInput, ToolSpec};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const FINAL_ANSWER_ACTION: &str = "Final Answer";
const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const OBSERVATION_STOP: &str = "\nObservation:";

static REACT_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("react action pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub enum AgentAction {
    Tool {
        name: String,
        input: ToolInput,
        log: String,
    },
    Finish(String),
}

/// A tool call already made this run, with what it returned.
#[derive(Debug, Clone)]
pub struct Step {
    pub log: String,
    pub observation: String,
}

#[derive(Debug, Clone)]
pub struct AgentPrompt {
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Replies are a JSON blob `{"action": .., "action_input": ..}`.
    ConversationalChat,
    /// Thought / Action / Action Input / Observation text, ending in `Final Answer:`.
    ZeroShotReact,
}

impl Strategy {
    pub fn default_prompt(self) -> AgentPrompt {
        match self {
            Self::ConversationalChat => AgentPrompt {
                prefix: CUSTOM_CHATBOT_PREFIX.to_string(),
                suffix: CUSTOM_CHATBOT_SUFFIX.to_string(),
            },
            Self::ZeroShotReact => AgentPrompt {
                prefix: BING_PROMPT_PREFIX.to_string(),
                suffix: REACT_SUFFIX.to_string(),
            },
        }
    }

    pub fn stop_sequences(self) -> Option<Vec<String>> {
        match self {
            Self::ConversationalChat => None,
            Self::ZeroShotReact => Some(vec![OBSERVATION_STOP.to_string()]),
        }
    }

    pub fn build_messages(
        self,
        prompt: &AgentPrompt,
        tools: &[ToolSpec],
        history: &[ChatMessage],
        input: &str,
        steps: &[Step],
    ) -> Vec<ChatMessage> {
        let tool_names = tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        match self {
            Self::ConversationalChat => {
                let tool_lines = tools
                    .iter()
                    .map(|t| format!("> {}: {}", t.name, t.description.trim_end()))
                    .collect::<Vec<_>>()
                    .join("\n");
                let format_instructions = render(
                    CONVERSATIONAL_FORMAT_INSTRUCTIONS,
                    &[("tool_names", tool_names.as_str())],
                );

                let mut messages = vec![ChatMessage::system(prompt.prefix.clone())];
                messages.extend_from_slice(history);
                messages.push(ChatMessage::user(render(
                    &prompt.suffix,
                    &[
                        ("tools", tool_lines.as_str()),
                        ("format_instructions", format_instructions.as_str()),
                        ("input", input),
                    ],
                )));

                for step in steps {
                    messages.push(ChatMessage::assistant(step.log.clone()));
                    messages.push(ChatMessage::user(render(
                        CONVERSATIONAL_TOOL_RESPONSE,
                        &[("observation", step.observation.as_str())],
                    )));
                }
                messages
            }
            Self::ZeroShotReact => {
                let tool_lines = tools
                    .iter()
                    .map(|t| format!("{}: {}", t.name, t.description.trim_end()))
                    .collect::<Vec<_>>()
                    .join("\n");
                let scratchpad: String = steps
                    .iter()
                    .map(|s| format!("{}\nObservation: {}\nThought:", s.log, s.observation))
                    .collect();

                let body = format!(
                    "{}\n\n{}\n\n{}\n\n{}",
                    prompt.prefix,
                    tool_lines,
                    render(REACT_FORMAT_INSTRUCTIONS, &[("tool_names", tool_names.as_str())]),
                    render(
                        &prompt.suffix,
                        &[("input", input), ("agent_scratchpad", scratchpad.as_str())],
                    ),
                );

                let mut messages = history.to_vec();
                messages.push(ChatMessage::user(body));
                messages
            }
        }
    }

    pub fn parse(self, text: &str) -> Result<AgentAction, AgentError> {
        match self {
            Self::ConversationalChat => parse_json_action(text),
            Self::ZeroShotReact => parse_react(text),
        }
    }
}

/// Substitute `{key}` placeholders in one pass over `template`. Inserted
/// values are never scanned again, and unknown `{...}` text is kept as is.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let found = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, end))
        });

        match found {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn parse_json_action(text: &str) -> Result<AgentAction, AgentError> {
    let value = extract_json_values(text)
        .into_iter()
        .find(|v| v.get("action").is_some())
        .ok_or_else(|| AgentError::OutputParse(text.to_string()))?;

    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::OutputParse(text.to_string()))?;
    let action_input = value.get("action_input").cloned().unwrap_or(Value::Null);

    if action == FINAL_ANSWER_ACTION {
        let answer = match action_input {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        return Ok(AgentAction::Finish(answer));
    }

    Ok(AgentAction::Tool {
        name: action.to_string(),
        input: ToolInput::from(action_input),
        log: text.to_string(),
    })
}

fn parse_react(text: &str) -> Result<AgentAction, AgentError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = REACT_ACTION.captures(text) {
        if includes_answer {
            return Err(AgentError::OutputParse(text.to_string()));
        }

        let name = caps[1].trim().to_string();
        let raw_input = caps[2].split(OBSERVATION_STOP).next().unwrap_or_default();
        let input = raw_input.trim().trim_matches('"').to_string();

        return Ok(AgentAction::Tool {
            name,
            input: ToolInput::Query(input),
            log: text.to_string(),
        });
    }

    match text.rsplit_once(FINAL_ANSWER_MARKER) {
        Some((_, answer)) => Ok(AgentAction::Finish(answer.trim().to_string())),
        None => Err(AgentError::OutputParse(text.to_string())),
    }
}

/// Every top-level JSON object embedded in free text, in order.
fn extract_json_values(text: &str) -> Vec<Value> {
    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escape_next => escape_next = false,
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(s) = start.take()
                    && let Ok(value) = serde_json::from_str::<Value>(&text[s..=i])
                {
                    values.push(value);
                }
            }
            _ => {}
        }
    }

    values
}
