use crate::clients::ai::{CompletionBackend, CredentialProvider};
use crate::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const GROK_API_URL: &str = "https://api.x.ai/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostedProvider {
    OpenAi,
    Grok,
}

impl HostedProvider {
    pub fn name(self) -> &'static str {
        match self {
            HostedProvider::OpenAi => "openai",
            HostedProvider::Grok => "grok",
        }
    }

    pub fn key_var(self) -> &'static str {
        match self {
            HostedProvider::OpenAi => "OPENAI_API_KEY",
            HostedProvider::Grok => "GROK_API_KEY",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            HostedProvider::OpenAi => OPENAI_API_URL,
            HostedProvider::Grok => GROK_API_URL,
        }
    }

    fn supports_json_mode(self) -> bool {
        matches!(self, HostedProvider::OpenAi)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    type_: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completion transport.
pub struct ChatCompletionClient {
    client: Client,
    provider: HostedProvider,
    endpoint: Url,
    model: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ChatCompletionClient {
    pub fn new(
        provider: HostedProvider,
        base_url: Url,
        model: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            provider,
            endpoint: chat_endpoint(&base_url)?,
            model: model.to_string(),
            credentials,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: self.provider.supports_json_mode().then(|| ResponseFormat {
                type_: "json_object".to_string(),
            }),
            temperature: 0.7,
        }
    }

    async fn call_api(&self, prompt: &str) -> Result<String> {
        let name = self.provider.name();
        let api_key = self
            .credentials
            .api_key()
            .ok_or_else(|| AppError::ExternalApi(format!("{} not set", self.provider.key_var())))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("{} API request timed out", name))
                } else {
                    AppError::ExternalApi(format!("{} API request failed: {}", name, e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimit);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApi(format!(
                "{} API returned {}: {}",
                name, status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse {} response: {}", name, e)))?;

        let content = extract_content(chat_response)
            .ok_or_else(|| AppError::ExternalApi(format!("No content in {} response", name)))?;

        debug!(provider = name, bytes = content.len(), "Chat completion received");

        Ok(content)
    }
}

fn chat_endpoint(base_url: &Url) -> Result<Url> {
    let base = format!("{}/", base_url.as_str().trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|u| u.join("chat/completions"))
        .map_err(|e| AppError::Validation(format!("Invalid API URL {}: {}", base_url, e)))
}

fn extract_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
}

#[async_trait]
impl CompletionBackend for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.call_api(prompt).await
    }

    fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}
