use crate::clients::ai::{BackendProvider, HostedProvider};
use crate::{AppError, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_RUNNER: &str = "ollama";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CHUNK_WORDS: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    RuleBased,
    Delegated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    SingleShot,
    /// Summarize word windows first, then synthesize the record from the summaries.
    TwoStage { chunk_words: usize },
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub provider: BackendProvider,
    pub model: String,
    pub runner: String,
    pub api_url: Url,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub analyzer: AnalyzerKind,
    pub backend: BackendConfig,
    pub prompt_mode: PromptMode,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let analyzer = match get("MARKET_ANALYZER").as_deref() {
            None | Some("rule") | Some("rule-based") => AnalyzerKind::RuleBased,
            Some("delegated") => AnalyzerKind::Delegated,
            Some(other) => return Err(invalid("MARKET_ANALYZER", other)),
        };

        let provider = match get("MARKET_BACKEND").as_deref() {
            None | Some("ollama") => BackendProvider::Ollama,
            Some("openai") => BackendProvider::OpenAi,
            Some("grok") => BackendProvider::Grok,
            Some(other) => return Err(invalid("MARKET_BACKEND", other)),
        };

        let hosted = match provider {
            BackendProvider::Ollama => None,
            BackendProvider::OpenAi => Some(HostedProvider::OpenAi),
            BackendProvider::Grok => Some(HostedProvider::Grok),
        };

        let model = get("MARKET_MODEL").unwrap_or_else(|| default_model(provider).to_string());

        let raw_url = get("MARKET_API_URL").unwrap_or_else(|| {
            hosted
                .unwrap_or(HostedProvider::OpenAi)
                .default_url()
                .to_string()
        });
        let api_url = Url::parse(&raw_url).map_err(|_| invalid("MARKET_API_URL", &raw_url))?;

        let timeout_secs = parse_or(
            "MARKET_BACKEND_TIMEOUT_SECS",
            get("MARKET_BACKEND_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(invalid("MARKET_BACKEND_TIMEOUT_SECS", "0"));
        }

        let prompt_mode = match get("MARKET_PROMPT_MODE").as_deref() {
            None | Some("single") => PromptMode::SingleShot,
            Some("two-stage") => {
                let chunk_words =
                    parse_or("MARKET_CHUNK_WORDS", get("MARKET_CHUNK_WORDS"), DEFAULT_CHUNK_WORDS)?;
                if chunk_words == 0 {
                    return Err(invalid("MARKET_CHUNK_WORDS", "0"));
                }
                PromptMode::TwoStage { chunk_words }
            }
            Some(other) => return Err(invalid("MARKET_PROMPT_MODE", other)),
        };

        let bind_addr = parse_or(
            "MARKET_BIND_ADDR",
            get("MARKET_BIND_ADDR"),
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        )?;

        Ok(Self {
            analyzer,
            backend: BackendConfig {
                provider,
                model,
                runner: get("MARKET_RUNNER").unwrap_or_else(|| DEFAULT_RUNNER.to_string()),
                api_url,
                timeout: Duration::from_secs(timeout_secs),
                api_key: hosted.and_then(|h| get(h.key_var())),
            },
            prompt_mode,
            bind_addr,
        })
    }
}

fn default_model(provider: BackendProvider) -> &'static str {
    match provider {
        BackendProvider::Ollama => "aicrue:latest",
        BackendProvider::OpenAi => "gpt-4o-mini",
        BackendProvider::Grok => "grok-beta",
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| invalid(key, &raw)),
    }
}

fn invalid(key: &str, value: &str) -> AppError {
    AppError::Validation(format!("Invalid value for {}: {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.analyzer, AnalyzerKind::RuleBased);
        assert_eq!(config.backend.provider, BackendProvider::Ollama);
        assert_eq!(config.backend.model, "aicrue:latest");
        assert_eq!(config.backend.runner, "ollama");
        assert_eq!(config.backend.timeout, Duration::from_secs(120));
        assert_eq!(config.backend.api_key, None);
        assert_eq!(config.prompt_mode, PromptMode::SingleShot);
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_hosted_backend_captures_its_key() {
        let config = config_from(&[
            ("MARKET_ANALYZER", "delegated"),
            ("MARKET_BACKEND", "grok"),
            ("GROK_API_KEY", "xai-123"),
            ("OPENAI_API_KEY", "sk-ignored"),
        ])
        .unwrap();

        assert_eq!(config.analyzer, AnalyzerKind::Delegated);
        assert_eq!(config.backend.model, "grok-beta");
        assert_eq!(config.backend.api_url.as_str(), "https://api.x.ai/v1");
        assert_eq!(config.backend.api_key.as_deref(), Some("xai-123"));
    }

    #[test]
    fn test_missing_key_is_not_a_startup_error() {
        let config = config_from(&[("MARKET_BACKEND", "openai")]).unwrap();
        assert_eq!(config.backend.api_key, None);
    }

    #[test]
    fn test_two_stage_mode() {
        let config =
            config_from(&[("MARKET_PROMPT_MODE", "two-stage"), ("MARKET_CHUNK_WORDS", "50")]).unwrap();
        assert_eq!(config.prompt_mode, PromptMode::TwoStage { chunk_words: 50 });
    }

    #[test]
    fn test_invalid_values() {
        let cases = vec![
            ("MARKET_ANALYZER", "magic"),
            ("MARKET_BACKEND", "mainframe"),
            ("MARKET_BACKEND_TIMEOUT_SECS", "soon"),
            ("MARKET_BACKEND_TIMEOUT_SECS", "0"),
            ("MARKET_API_URL", "not a url"),
            ("MARKET_BIND_ADDR", "localhost"),
            ("MARKET_PROMPT_MODE", "three-stage"),
        ];

        for (key, value) in cases {
            let err = config_from(&[(key, value)]).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{}={}", key, value);
            assert!(err.to_string().contains(key));
        }
    }
}
