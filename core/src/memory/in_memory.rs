use crate::traits::{ChatHistory, ChatTurn};
use anyhow::Result;
use std::sync::{Mutex, PoisonError};

/// Process-local history. Lost on restart.
#[derive(Default)]
pub struct InMemoryChatHistory {
    turns: Mutex<Vec<ChatTurn>>,
}

impl InMemoryChatHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatHistory for InMemoryChatHistory {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    fn append(&self, turn: ChatTurn) -> Result<()> {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(turn);
        Ok(())
    }

    fn last(&self, k: usize) -> Result<Vec<ChatTurn>> {
        let turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        let start = turns.len().saturating_sub(k);
        Ok(turns[start..].to_vec())
    }

    fn clear(&self) -> Result<()> {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}
