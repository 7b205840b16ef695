use serde::{Deserialize, Serialize};

pub const NO_SUMMARY: &str = "No summary available";
pub const NO_JSON_DETECTED: &str = "No valid JSON detected.";

// Analysis Types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub trend: String,
    pub summary: String,
    pub drivers: Vec<String>,
    pub risks: Vec<String>,
}

impl AnalysisRecord {
    pub fn new(trend: Trend, summary: impl Into<String>, drivers: &[&str], risks: &[&str]) -> Self {
        Self {
            trend: trend.label().to_string(),
            summary: summary.into(),
            drivers: drivers.iter().map(|d| d.to_string()).collect(),
            risks: risks.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Degraded record for a backend or parse failure; the failure text becomes the summary.
    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(Trend::Error, detail, &[], &[])
    }

    /// Record returned when the model reply carries no JSON object at all.
    pub fn no_json() -> Self {
        Self::new(Trend::Unknown, NO_JSON_DETECTED, &[], &[])
    }

    pub fn classify(&self) -> Trend {
        Trend::classify(&self.trend)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
    Unknown,
    Error,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Positive => "Positive",
            Trend::Negative => "Negative",
            Trend::Neutral => "Neutral",
            Trend::Unknown => "Unknown",
            Trend::Error => "Error",
        }
    }

    /// Maps a free-form trend label (as emitted by a model) onto a category.
    pub fn classify(label: &str) -> Trend {
        match label.trim().to_lowercase().as_str() {
            "positive" | "increasing" | "bullish" => Trend::Positive,
            "negative" | "decreasing" | "bearish" => Trend::Negative,
            "neutral" | "stable" => Trend::Neutral,
            "error" => Trend::Error,
            _ => Trend::Unknown,
        }
    }
}

/// Exported artifact. Key set is fixed: trend, summary, drivers, risks, sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub trend: String,
    pub summary: String,
    pub drivers: Vec<String>,
    pub risks: Vec<String>,
    pub sales: Vec<u64>,
}

// Request Types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Text,
    Csv,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub format: InputFormat,
}

// Response Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBadge {
    Up,
    Down,
    Stable,
}

impl TrendBadge {
    pub fn from_label(label: &str) -> Self {
        match Trend::classify(label) {
            Trend::Positive => TrendBadge::Up,
            Trend::Negative => TrendBadge::Down,
            _ => TrendBadge::Stable,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            TrendBadge::Up => "Market is trending upward",
            TrendBadge::Down => "Market is trending downward",
            TrendBadge::Stable => "Market is stable",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BadgeView {
    pub state: TrendBadge,
    pub message: &'static str,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub quarters: Vec<String>,
    pub sales: Vec<u64>,
}

impl ChartData {
    /// Line and pie charts need at least two points.
    pub fn from_series(sales: &[u64]) -> Option<Self> {
        if sales.len() < 2 {
            return None;
        }

        Some(Self {
            quarters: (1..=sales.len()).map(|i| format!("Q{}", i)).collect(),
            sales: sales.to_vec(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub report: Report,
    pub badge: BadgeView,
    pub chart: Option<ChartData>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub execution_time_ms: u64,
    pub analyzer: String,
    pub backend: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_synonyms() {
        let cases = vec![
            ("Positive", Trend::Positive),
            ("BULLISH", Trend::Positive),
            (" increasing ", Trend::Positive),
            ("bearish", Trend::Negative),
            ("Decreasing", Trend::Negative),
            ("Neutral", Trend::Neutral),
            ("error", Trend::Error),
            ("sideways-ish", Trend::Unknown),
            ("", Trend::Unknown),
        ];

        for (label, expected) in cases {
            assert_eq!(Trend::classify(label), expected, "label {:?}", label);
        }
    }

    #[test]
    fn test_badge_three_way() {
        assert_eq!(TrendBadge::from_label("Bullish"), TrendBadge::Up);
        assert_eq!(TrendBadge::from_label("negative"), TrendBadge::Down);
        assert_eq!(TrendBadge::from_label("Neutral"), TrendBadge::Stable);
        assert_eq!(TrendBadge::from_label("Unknown"), TrendBadge::Stable);
        assert_eq!(TrendBadge::from_label("Error"), TrendBadge::Stable);
    }

    #[test]
    fn test_chart_requires_two_points() {
        assert!(ChartData::from_series(&[]).is_none());
        assert!(ChartData::from_series(&[100]).is_none());

        let chart = ChartData::from_series(&[100, 200, 300]).unwrap();
        assert_eq!(chart.quarters, vec!["Q1", "Q2", "Q3"]);
        assert_eq!(chart.sales, vec![100, 200, 300]);
    }

    #[test]
    fn test_request_defaults_to_text() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"text": "Q1 $5"}"#).unwrap();
        assert_eq!(request.format, InputFormat::Text);

        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"text": "a,b", "format": "csv"}"#).unwrap();
        assert_eq!(request.format, InputFormat::Csv);
    }
}
