pub mod delegated;
pub mod extract;
pub mod report;
pub mod rule_based;

pub use delegated::DelegatedAnalyzer;
pub use extract::extract_sales;
pub use report::assemble_report;
pub use rule_based::RuleBasedAnalyzer;

use crate::clients::{create_backend, StaticCredentials};
use crate::config::{AnalyzerKind, Config};
use crate::types::AnalysisRecord;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Produces an analysis record from raw market text.
///
/// Implementations never fail: backend and parse faults are folded into a
/// degraded record so callers can treat every outcome the same way.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> AnalysisRecord;
    fn strategy_name(&self) -> &'static str;

    fn backend_name(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_analyzer(config: &Config) -> Result<Arc<dyn Analyzer>> {
    match config.analyzer {
        AnalyzerKind::RuleBased => Ok(Arc::new(RuleBasedAnalyzer::new())),
        AnalyzerKind::Delegated => {
            let credentials = Arc::new(StaticCredentials::new(config.backend.api_key.clone()));
            let backend = create_backend(&config.backend, credentials)?;
            Ok(Arc::new(DelegatedAnalyzer::new(
                backend,
                config.prompt_mode,
                config.backend.timeout,
            )))
        }
    }
}
