use crate::config::LlmConfig;
use crate::providers::AzureOpenAIProvider;
use crate::traits::Provider;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;

pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn Provider>> {
    if config.endpoint.is_empty() {
        return Err(anyhow!(
            "No LLM endpoint configured. Set llm.endpoint or AZURE_OPENAI_ENDPOINT"
        ));
    }
    if config.api_key.is_empty() {
        return Err(anyhow!(
            "No LLM API key found. Set llm.api_key or AZURE_OPENAI_API_KEY"
        ));
    }

    let provider = AzureOpenAIProvider::new(config.endpoint.clone(), config.api_key.clone())
        .with_deployment(config.deployment.clone())
        .with_api_version(config.api_version.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_timeouts(
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        );

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_an_error() {
        let config = LlmConfig {
            endpoint: "https://acme.openai.azure.com".to_string(),
            ..LlmConfig::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn builds_configured_deployment() {
        let config = LlmConfig {
            endpoint: "https://acme.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            deployment: "gpt-35-turbo".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.deployment(), "gpt-35-turbo");
    }
}
