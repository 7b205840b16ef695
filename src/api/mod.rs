pub mod analyze;
pub mod dashboard;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::analysis::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn Analyzer>,
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard::handler))
        .route("/api/analyze", post(analyze::handler))
        .route("/api/report", post(analyze::download_handler))
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
