use crate::traits::{ChatHistory, ChatMessage, ChatTurn};
use anyhow::Result;
use std::sync::Arc;

/// Buffer-window view over a session: the last `k` exchanges.
#[derive(Clone)]
pub struct WindowMemory {
    history: Arc<dyn ChatHistory>,
    k: usize,
}

impl WindowMemory {
    pub fn new(history: Arc<dyn ChatHistory>, k: usize) -> Self {
        Self { history, k }
    }

    /// Each exchange is a human turn plus an AI turn.
    pub fn load(&self) -> Result<Vec<ChatMessage>> {
        let turns = self.history.last(self.k * 2)?;
        Ok(turns.iter().map(ChatTurn::to_message).collect())
    }

    pub fn save(&self, input: &str, output: &str) -> Result<()> {
        self.history.append(ChatTurn::human(input))?;
        self.history.append(ChatTurn::ai(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryChatHistory;

    #[test]
    fn load_keeps_last_k_exchanges() {
        let memory = WindowMemory::new(Arc::new(InMemoryChatHistory::new()), 2);
        for i in 0..4 {
            memory.save(&format!("q{i}"), &format!("a{i}")).unwrap();
        }

        let messages = memory.load().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatMessage::user("q2"));
        assert_eq!(messages[3], ChatMessage::assistant("a3"));
    }

    #[test]
    fn zero_window_loads_nothing() {
        let memory = WindowMemory::new(Arc::new(InMemoryChatHistory::new()), 0);
        memory.save("q", "a").unwrap();
        assert!(memory.load().unwrap().is_empty());
    }
}
