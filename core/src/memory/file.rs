use crate::traits::{ChatHistory, ChatTurn};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// History for one session kept as a JSON array on disk at
/// `<root>/history/<user_id>/<session_id>.json`.
///
/// Handles on the same file must share one lock (see [`with_lock`]) or
/// concurrent appends overwrite each other.
///
/// [`with_lock`]: FileChatHistory::with_lock
pub struct FileChatHistory {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileChatHistory {
    pub fn new(root: impl AsRef<Path>, user_id: &str, session_id: &str) -> Self {
        let path = root
            .as_ref()
            .join("history")
            .join(sanitize_id(user_id))
            .join(format!("{}.json", sanitize_id(session_id)));

        Self {
            path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_turns(&self) -> Result<Vec<ChatTurn>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history from {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history at {}", self.path.display()))
    }

    fn write_turns(&self, turns: &[ChatTurn]) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(turns)?;

        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write history to {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

/// Keep ids usable as single path components.
fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

impl ChatHistory for FileChatHistory {
    fn name(&self) -> &str {
        "file"
    }

    fn prepare(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        if !self.path.exists() {
            self.write_turns(&[])?;
        }
        Ok(())
    }

    fn append(&self, turn: ChatTurn) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut turns = self.read_turns()?;
        turns.push(turn);
        self.write_turns(&turns)
    }

    fn last(&self, k: usize) -> Result<Vec<ChatTurn>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut turns = self.read_turns()?;
        let start = turns.len().saturating_sub(k);
        Ok(turns.split_off(start))
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(());
        }
        self.write_turns(&[])
    }
}
