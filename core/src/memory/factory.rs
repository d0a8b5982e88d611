use crate::config::{MemoryBackend, MemoryConfig};
use crate::memory::{FileChatHistory, InMemoryChatHistory};
use crate::traits::ChatHistory;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

type SessionKey = (String, String);
type FileLocks = Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>;

/// Opens the history of a `(user_id, session_id)` pair. Built once at
/// startup; every request opens its own handle through it. File handles
/// for the same session share one lock.
#[derive(Clone)]
pub enum SessionStore {
    File {
        root: PathBuf,
        locks: FileLocks,
    },
    InMemory {
        sessions: Arc<Mutex<HashMap<SessionKey, Arc<InMemoryChatHistory>>>>,
    },
}

impl SessionStore {
    pub fn file(root: impl Into<PathBuf>) -> Self {
        Self::File {
            root: root.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn in_memory() -> Self {
        Self::InMemory {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn open(&self, user_id: &str, session_id: &str) -> Arc<dyn ChatHistory> {
        match self {
            Self::File { root, locks } => {
                let history = FileChatHistory::new(root, user_id, session_id);
                let lock = locks
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry(history.path().to_path_buf())
                    .or_default()
                    .clone();
                Arc::new(history.with_lock(lock))
            }
            Self::InMemory { sessions } => {
                let mut sessions = sessions.lock().unwrap_or_else(PoisonError::into_inner);
                sessions
                    .entry((user_id.to_string(), session_id.to_string()))
                    .or_default()
                    .clone()
            }
        }
    }
}

pub fn create_store(config: &MemoryConfig) -> SessionStore {
    match config.backend {
        MemoryBackend::File => SessionStore::file(&config.data_dir),
        MemoryBackend::InMemory => SessionStore::in_memory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChatTurn;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn factory_file() {
        let tmp = TempDir::new().unwrap();
        let config = MemoryConfig {
            data_dir: tmp.path().to_path_buf(),
            ..MemoryConfig::default()
        };
        let history = create_store(&config).open("u1", "s1");
        assert_eq!(history.name(), "file");
    }

    #[test]
    fn in_memory_sessions_survive_reopen() {
        let store = SessionStore::in_memory();
        store.open("u1", "s1").append(ChatTurn::human("hi")).unwrap();

        assert_eq!(store.open("u1", "s1").last(5).unwrap().len(), 1);
        assert!(store.open("u1", "s2").last(5).unwrap().is_empty());
        assert!(store.open("u2", "s1").last(5).unwrap().is_empty());
    }

    #[test]
    fn concurrent_file_appends_keep_every_turn() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::file(tmp.path());
        store.open("u1", "s1").prepare().unwrap();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .open("u1", "s1")
                            .append(ChatTurn::human(format!("{worker}-{i}")))
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.open("u1", "s1").last(1000).unwrap().len(), 200);
    }

    #[test]
    fn ids_that_sanitize_alike_share_a_lock() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::file(tmp.path());
        store.open("u/1", "s1");
        store.open("u_1", "s1");

        let SessionStore::File { locks, .. } = &store else {
            panic!("expected file store");
        };
        assert_eq!(locks.lock().unwrap().len(), 1);
    }
}
