use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::report::{render_report, REPORT_FILE_NAME};
use crate::analysis::{assemble_report, extract_sales};
use crate::api::AppState;
use crate::ingest::prepare_input;
use crate::types::{
    AnalyzeRequest, AnalyzeResponse, BadgeView, ChartData, Report, ResponseMetadata, TrendBadge,
};
use crate::Result;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    let start = Instant::now();

    let report = run_pipeline(&state, &request).await?;
    let badge = TrendBadge::from_label(&report.trend);
    let chart = ChartData::from_series(&report.sales);

    let execution_time = start.elapsed().as_millis() as u64;

    Ok(Json(AnalyzeResponse {
        badge: BadgeView {
            state: badge,
            message: badge.message(),
        },
        chart,
        report,
        metadata: ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            execution_time_ms: execution_time,
            analyzer: state.analyzer.strategy_name().to_string(),
            backend: state.analyzer.backend_name().map(str::to_string),
        },
    }))
}

/// Same pipeline, answered with the report as a downloadable file.
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response> {
    let report = run_pipeline(&state, &request).await?;
    let body = render_report(&report)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

async fn run_pipeline(state: &AppState, request: &AnalyzeRequest) -> Result<Report> {
    // Blank input never reaches an analyzer
    let text = prepare_input(&request.text, request.format)?;

    tracing::info!(
        analyzer = state.analyzer.strategy_name(),
        bytes = text.len(),
        "Analyzing market data"
    );

    let record = state.analyzer.analyze(&text).await;
    let sales = extract_sales(&text);

    tracing::info!(trend = %record.trend, points = sales.len(), "Analysis complete");

    Ok(assemble_report(&record, &sales))
}
