use async_trait::async_trait;

use crate::analysis::extract::extract_sales;
use crate::analysis::Analyzer;
use crate::types::{AnalysisRecord, Trend};

pub const NO_SALES_DATA: &str = "No sales data available.";

const POSITIVE_DRIVERS: &[&str] = &["Strong marketing campaigns", "High customer demand"];
const POSITIVE_RISKS: &[&str] = &["Minor supply issues"];
const FLAT_DRIVERS: &[&str] = &["Stable market conditions"];
const FLAT_RISKS: &[&str] = &["Economic slowdown", "Supply chain delays"];

/// Heuristic analyzer with no external calls.
///
/// Only the first and last extracted amounts are compared. There is no fit,
/// no volatility measure and no forecasting; this path is the zero-dependency
/// fallback when no model backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Analyzer for RuleBasedAnalyzer {
    async fn analyze(&self, text: &str) -> AnalysisRecord {
        analyze_series(&extract_sales(text))
    }

    fn strategy_name(&self) -> &'static str {
        "rule-based"
    }
}

pub fn analyze_series(sales: &[u64]) -> AnalysisRecord {
    let (first, last) = match (sales.first(), sales.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return AnalysisRecord::new(Trend::Neutral, NO_SALES_DATA, &[], FLAT_RISKS),
    };

    if last > first {
        AnalysisRecord::new(
            Trend::Positive,
            format!("Sales increased from ${} to ${} over the period.", first, last),
            POSITIVE_DRIVERS,
            POSITIVE_RISKS,
        )
    } else if last < first {
        AnalysisRecord::new(
            Trend::Negative,
            format!("Sales decreased from ${} to ${} over the period.", first, last),
            FLAT_DRIVERS,
            FLAT_RISKS,
        )
    } else {
        AnalysisRecord::new(
            Trend::Neutral,
            format!("Sales remained stable at ${}.", first),
            FLAT_DRIVERS,
            FLAT_RISKS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_last_comparison() {
        assert_eq!(analyze_series(&[100, 50, 300]).trend, "Positive");
        assert_eq!(analyze_series(&[300, 900, 100]).trend, "Negative");
        assert_eq!(analyze_series(&[200, 10, 200]).trend, "Neutral");
        assert_eq!(analyze_series(&[42]).trend, "Neutral");
    }

    #[test]
    fn test_empty_series() {
        let record = analyze_series(&[]);
        assert_eq!(record.trend, "Neutral");
        assert_eq!(record.summary, NO_SALES_DATA);
        assert!(record.drivers.is_empty());
        assert_eq!(record.risks, vec!["Economic slowdown", "Supply chain delays"]);
    }

    #[test]
    fn test_negative_lists_and_summary() {
        let record = analyze_series(&[500, 250]);
        assert_eq!(record.summary, "Sales decreased from $500 to $250 over the period.");
        assert_eq!(record.drivers, vec!["Stable market conditions"]);
        assert_eq!(record.risks, vec!["Economic slowdown", "Supply chain delays"]);
    }

    #[test]
    fn test_stable_summary() {
        let record = analyze_series(&[75, 75]);
        assert_eq!(record.summary, "Sales remained stable at $75.");
    }

    #[tokio::test]
    async fn test_quarterly_growth_scenario() {
        let analyzer = RuleBasedAnalyzer::new();
        let record = analyzer
            .analyze("Q1 $120,000 | Q2 $135,000 | Q3 $160,000 | Q4 $180,000")
            .await;

        assert_eq!(record.trend, "Positive");
        assert!(record.summary.contains("120000"));
        assert!(record.summary.contains("180000"));
        assert_eq!(
            record.drivers,
            vec!["Strong marketing campaigns", "High customer demand"]
        );
        assert_eq!(record.risks, vec!["Minor supply issues"]);
    }
}
