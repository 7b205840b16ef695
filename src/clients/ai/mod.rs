pub mod hosted;
pub mod prompts;
pub mod runner;

pub use hosted::{ChatCompletionClient, HostedProvider};
pub use runner::LocalRunnerClient;

use crate::config::BackendConfig;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendProvider {
    Ollama,
    OpenAi,
    Grok,
}

/// Turns a prompt into free-form model text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
    fn provider_name(&self) -> &'static str;
}

pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Credential captured once by the config layer.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    api_key: Option<String>,
}

impl StaticCredentials {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }
}

pub fn create_backend(
    config: &BackendConfig,
    credentials: Arc<dyn CredentialProvider>,
) -> Result<Arc<dyn CompletionBackend>> {
    match config.provider {
        BackendProvider::Ollama => Ok(Arc::new(LocalRunnerClient::new(
            &config.runner,
            vec!["run".to_string(), config.model.clone()],
        ))),
        BackendProvider::OpenAi => Ok(Arc::new(ChatCompletionClient::new(
            HostedProvider::OpenAi,
            config.api_url.clone(),
            &config.model,
            config.timeout,
            credentials,
        )?)),
        BackendProvider::Grok => Ok(Arc::new(ChatCompletionClient::new(
            HostedProvider::Grok,
            config.api_url.clone(),
            &config.model,
            config.timeout,
            credentials,
        )?)),
    }
}
