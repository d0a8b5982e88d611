use crate::agent::prompts::REFORMAT_PROMPT;
use crate::agent::{AgentError, AgentExecutor};
use crate::traits::Provider;
use tracing::warn;

pub const MAX_PARSE_ATTEMPTS: usize = 5;

/// Run `executor` on `question`, repairing unparsable model output.
///
/// A parse failure is handed to the executor's LLM to be stripped of JSON
/// scaffolding and the parse-error preamble, and that text becomes the
/// candidate answer. The executor is then tried again from scratch, up to
/// [`MAX_PARSE_ATTEMPTS`] runs in total. If every run fails to parse, the
/// last reformatted text is returned. Any other error is returned as is.
pub fn run_agent<E>(question: &str, executor: &E) -> Result<String, AgentError>
where
    E: AgentExecutor + ?Sized,
{
    let mut response = String::new();

    for attempt in 1..=MAX_PARSE_ATTEMPTS {
        match executor.run(question) {
            Ok(answer) => return Ok(answer),
            Err(err @ AgentError::OutputParse(_)) => {
                warn!(attempt, "agent output could not be parsed, reformatting");
                response = reformat(executor.llm().as_ref(), &err.to_string())?;
            }
            Err(err) => return Err(err),
        }
    }

    warn!(
        attempts = MAX_PARSE_ATTEMPTS,
        "agent never produced parsable output, returning reformatted text"
    );
    Ok(response)
}

fn reformat(llm: &dyn Provider, error: &str) -> Result<String, AgentError> {
    let prompt = REFORMAT_PROMPT.replace("{error}", error);
    llm.complete(&prompt).map_err(AgentError::Llm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ChatRequest, ChatResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Reformatter {
        prompts: Mutex<Vec<String>>,
    }

    impl Provider for Reformatter {
        fn deployment(&self) -> &str {
            "reformatter"
        }

        fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.messages[0].content.clone());
            Ok(ChatResponse {
                text: Some(format!("clean #{}", prompts.len())),
            })
        }
    }

    /// Fails to parse until `succeed_on`, then answers.
    struct Flaky {
        calls: AtomicUsize,
        succeed_on: Option<usize>,
        llm: Arc<Reformatter>,
    }

    impl Flaky {
        fn new(succeed_on: Option<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                succeed_on,
                llm: Arc::new(Reformatter {
                    prompts: Mutex::new(Vec::new()),
                }),
            }
        }
    }

    impl AgentExecutor for Flaky {
        fn run(&self, _input: &str) -> Result<String, AgentError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.succeed_on {
                Some(n) if call >= n => Ok(format!("answer from call {call}")),
                _ => Err(AgentError::OutputParse(format!("{{\"broken\": {call}"))),
            }
        }

        fn llm(&self) -> Arc<dyn Provider> {
            self.llm.clone()
        }
    }

    #[test]
    fn succeeds_after_two_parse_failures() {
        let executor = Flaky::new(Some(3));
        assert_eq!(run_agent("q", &executor).unwrap(), "answer from call 3");
        assert_eq!(executor.calls.load(Ordering::SeqCst), 3);
        assert_eq!(executor.llm.prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn stops_after_five_attempts() {
        let executor = Flaky::new(None);
        assert_eq!(run_agent("q", &executor).unwrap(), "clean #5");
        assert_eq!(executor.calls.load(Ordering::SeqCst), MAX_PARSE_ATTEMPTS);
    }

    #[test]
    fn reformat_prompt_carries_failed_output() {
        let executor = Flaky::new(Some(2));
        run_agent("q", &executor).unwrap();

        let prompts = executor.llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Could not parse LLM output: `{\"broken\": 1`"));
        assert!(prompts[0].starts_with("Remove any json formatting"));
    }

    #[test]
    fn other_errors_propagate() {
        struct Broken(Arc<Reformatter>);

        impl AgentExecutor for Broken {
            fn run(&self, _input: &str) -> Result<String, AgentError> {
                Err(AgentError::IterationLimit(15))
            }

            fn llm(&self) -> Arc<dyn Provider> {
                self.0.clone()
            }
        }

        let llm = Arc::new(Reformatter {
            prompts: Mutex::new(Vec::new()),
        });
        let executor = Broken(llm.clone());

        assert!(matches!(
            run_agent("q", &executor),
            Err(AgentError::IterationLimit(15))
        ));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn works_through_trait_object() {
        let executor: Box<dyn AgentExecutor> = Box::new(Flaky::new(Some(1)));
        assert_eq!(run_agent("q", executor.as_ref()).unwrap(), "answer from call 1");
    }
}
