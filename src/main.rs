use market_trend_analyzer::analysis::create_analyzer;
use market_trend_analyzer::api;
use market_trend_analyzer::config::Config;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_trend_analyzer=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;
    let analyzer = create_analyzer(&config).map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(
        analyzer = analyzer.strategy_name(),
        backend = ?analyzer.backend_name(),
        "Analyzer configured"
    );

    let app_state = Arc::new(api::AppState { analyzer });

    let app = api::create_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
