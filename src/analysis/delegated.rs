use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::analysis::Analyzer;
use crate::clients::ai::prompts::{build_analysis_prompt, build_chunk_prompt, build_final_prompt};
use crate::clients::CompletionBackend;
use crate::config::PromptMode;
use crate::types::{AnalysisRecord, Trend, NO_SUMMARY};
use crate::{AppError, Result};

/// Analyzer that hands the text to a model backend and repairs whatever comes back.
pub struct DelegatedAnalyzer {
    backend: Arc<dyn CompletionBackend>,
    mode: PromptMode,
    timeout: Duration,
}

impl DelegatedAnalyzer {
    pub fn new(backend: Arc<dyn CompletionBackend>, mode: PromptMode, timeout: Duration) -> Self {
        Self {
            backend,
            mode,
            timeout,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let name = self.backend.provider_name();
        debug!(backend = name, prompt_bytes = prompt.len(), "Sending prompt");

        let raw = tokio::time::timeout(self.timeout, self.backend.complete(prompt))
            .await
            .map_err(|_| {
                AppError::Timeout(format!("{} did not respond within {:?}", name, self.timeout))
            })??;

        debug!(backend = name, response_bytes = raw.len(), "Received response");
        Ok(raw)
    }

    async fn raw_response(&self, text: &str) -> Result<String> {
        match self.mode {
            PromptMode::SingleShot => self.complete(&build_analysis_prompt(text)).await,
            PromptMode::TwoStage { chunk_words } => {
                let chunks = split_words(text, chunk_words);
                info!(chunks = chunks.len(), "Running two-stage analysis");

                let mut summaries = Vec::with_capacity(chunks.len());
                for chunk in &chunks {
                    summaries.push(self.complete(&build_chunk_prompt(chunk)).await?);
                }

                self.complete(&build_final_prompt(&summaries)).await
            }
        }
    }
}

#[async_trait]
impl Analyzer for DelegatedAnalyzer {
    async fn analyze(&self, text: &str) -> AnalysisRecord {
        let result = match self.raw_response(text).await {
            Ok(raw) => parse_response(&raw),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            warn!(backend = self.backend.provider_name(), "Degraded analysis: {}", e);
            AnalysisRecord::error(e.to_string())
        })
    }

    fn strategy_name(&self) -> &'static str {
        "delegated"
    }

    fn backend_name(&self) -> Option<&'static str> {
        Some(self.backend.provider_name())
    }
}

fn split_words(text: &str, chunk_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_words.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Greedy span from the first `{` to the last `}`.
pub fn locate_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Turns raw model text into a valid record.
///
/// A reply with no braces at all yields the Unknown fallback. When the greedy
/// span does not decode (prose braces, several objects), every `{` is tried in
/// order and the first complete object wins. Only when nothing decodes is the
/// reply reported as malformed, carrying the greedy decode error.
pub fn parse_response(raw: &str) -> Result<AnalysisRecord> {
    let candidate = match locate_json_object(raw) {
        Some(candidate) => candidate,
        None => return Ok(AnalysisRecord::no_json()),
    };

    let object = match serde_json::from_str::<Map<String, Value>>(candidate) {
        Ok(object) => object,
        Err(greedy_err) => {
            first_complete_object(raw).ok_or_else(|| AppError::Parse(greedy_err.to_string()))?
        }
    };

    Ok(normalize(object))
}

fn first_complete_object(raw: &str) -> Option<Map<String, Value>> {
    raw.match_indices('{').find_map(|(offset, _)| {
        serde_json::Deserializer::from_str(&raw[offset..])
            .into_iter::<Map<String, Value>>()
            .next()
            .and_then(|parsed| parsed.ok())
    })
}

fn normalize(mut object: Map<String, Value>) -> AnalysisRecord {
    let trend = match object.remove("trend") {
        Some(Value::String(label)) if !label.trim().is_empty() => label,
        _ => Trend::Unknown.label().to_string(),
    };

    let summary = match object.remove("summary") {
        Some(Value::String(summary)) => summary,
        _ => NO_SUMMARY.to_string(),
    };

    AnalysisRecord {
        trend,
        summary,
        drivers: string_list(object.remove("drivers")),
        risks: string_list(object.remove("risks")),
    }
}

fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
