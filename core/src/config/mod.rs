use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ASKWEB_DIR: &str = ".askweb";
const REDACTED: &str = "********";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: "2023-05-15".to_string(),
            deployment: "gpt-4-32k".to_string(),
            temperature: 0.5,
            max_tokens: 1000,
            timeout_secs: 120,
            connect_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub subscription_key: String,
    pub k: usize,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.bing.microsoft.com".to_string(),
            subscription_key: String::new(),
            k: 5,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryBackend {
    #[default]
    File,
    InMemory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MemoryConfig {
    pub backend: MemoryBackend,
    pub data_dir: PathBuf,
    pub window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: MemoryBackend::File,
            data_dir: get_askweb_dir().join("data"),
            window: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub memory: MemoryConfig,
}

pub fn get_askweb_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(ASKWEB_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_askweb_dir().join("config.toml")
}

impl Config {
    /// Load from `path` (or the default location), falling back to defaults
    /// when the file is absent, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        let mut config = if path.exists() {
            load_config(&path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Config::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("AZURE_OPENAI_ENDPOINT") {
            self.llm.endpoint = v;
        }
        if let Some(v) = var("AZURE_OPENAI_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = var("AZURE_OPENAI_API_VERSION") {
            self.llm.api_version = v;
        }
        if let Some(v) = var("AZURE_OPENAI_DEPLOYMENT") {
            self.llm.deployment = v;
        }
        if let Some(v) = var("BING_SEARCH_URL") {
            self.search.endpoint = v;
        }
        if let Some(v) = var("BING_SUBSCRIPTION_KEY") {
            self.search.subscription_key = v;
        }
        if let Some(v) = var("ASKWEB_DATA_DIR") {
            self.memory.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("ASKWEB_BIND") {
            self.server.bind = v;
        }
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.llm.api_key.is_empty() {
            config.llm.api_key = REDACTED.to_string();
        }
        if !config.search.subscription_key.is_empty() {
            config.search.subscription_key = REDACTED.to_string();
        }
        config
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}
