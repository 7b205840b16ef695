use crate::types::{AnalysisRecord, Report};
use crate::{AppError, Result};

pub const REPORT_FILE_NAME: &str = "market_analysis.json";

pub fn assemble_report(record: &AnalysisRecord, sales: &[u64]) -> Report {
    Report {
        trend: record.trend.clone(),
        summary: record.summary.clone(),
        drivers: record.drivers.clone(),
        risks: record.risks.clone(),
        sales: sales.to_vec(),
    }
}

/// Pretty-printed body of the downloadable artifact.
pub fn render_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {}", e)))
}
