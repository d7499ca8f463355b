//! Frame Solver HTTP Server

use std::collections::BTreeMap;
use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use frame2d_solver::prelude::*;
use frame2d_solver::service::AnalysisService;

const DEFAULT_ADDR: &str = "0.0.0.0:8086";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    model: ModelSnapshot,
    #[serde(default)]
    options: Option<AnalysisOptions>,
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<ResultsData>,
}

#[derive(Debug, Serialize)]
struct ResultsData {
    status: AnalysisStatus,
    cases: BTreeMap<String, AnalysisResult>,
    combinations: BTreeMap<String, AnalysisResult>,
    summaries: BTreeMap<String, AnalysisSummary>,
    /// Error message per failed case or combination
    failures: BTreeMap<String, String>,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn analyze(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    match run_analysis(request).await {
        Ok(results) => (
            StatusCode::OK,
            Json(AnalysisResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AnalysisResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
            }),
        ),
    }
}

async fn run_analysis(request: AnalysisRequest) -> FrameResult<ResultsData> {
    let options = request.options.unwrap_or_default();
    let service = AnalysisService::new(request.model, options);

    let status = service.run_analysis().await?;
    let cache = service.cache().await;

    let summaries = cache
        .case_results
        .iter()
        .chain(&cache.combination_results)
        .map(|(name, result)| (name.clone(), result.summary()))
        .collect();

    Ok(ResultsData {
        status,
        summaries,
        failures: service.failures().await,
        cases: cache.case_results,
        combinations: cache.combination_results,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let addr_str = std::env::var("FRAME_SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = addr_str
        .parse()
        .with_context(|| format!("invalid FRAME_SERVER_ADDR '{}'", addr_str))?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors);

    info!("Frame Solver Server listening on http://{}", addr);
    println!("Frame Solver Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Analysis:     POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
