//! # HTTP API
//!
//! JSON endpoints over the KPI engine.
//!
//! | Method | Path                     | Body                  |
//! |--------|--------------------------|-----------------------|
//! | GET    | `/health`                |                       |
//! | GET    | `/benchmarks`            |                       |
//! | GET    | `/benchmarks/{industry}` |                       |
//! | POST   | `/kpis`                  | KPI input             |
//! | POST   | `/analyze`               | `{profile, input}`    |
//! | POST   | `/inefficiencies`        | `{metrics: [...]}`    |
//!
//! Errors are returned as `{"error": "..."}`.

use astramech_core::{
    AnalysisResult, AstraError, BenchmarkSet, CompanyProfile, Inefficiency, KpiCalculator,
    KpiInput, KpiMetric, KpiResults, analyze,
};
use crate::warn_defaulted;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// =============================================================================
// STATE
// =============================================================================

/// Shared across handlers. The calculator is read-only.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<KpiCalculator>,
}

impl AppState {
    pub fn new(calculator: KpiCalculator) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/benchmarks", get(list_industries))
        .route("/benchmarks/{industry}", get(industry_benchmarks))
        .route("/kpis", post(calculate_kpis))
        .route("/analyze", post(analyze_company))
        .route("/inefficiencies", post(find_inefficiencies))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("AstraMech listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error response.
#[derive(Debug)]
pub enum ApiError {
    /// Engine error; the status follows [`AstraError::is_client_error`].
    Engine(AstraError),
    /// The JSON extractor refused the body. Its status (400, 415, 422) is kept.
    Body(JsonRejection),
}

impl From<AstraError> for ApiError {
    fn from(err: AstraError) -> Self {
        Self::Engine(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Engine(err) => {
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.to_string())
            }
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
        };
        if status.is_server_error() {
            warn!(error = %message, "Request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndustriesResponse {
    pub industries: Vec<String>,
}

async fn list_industries(State(state): State<AppState>) -> Json<IndustriesResponse> {
    let industries = state
        .calculator
        .benchmarks()
        .industries()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(IndustriesResponse { industries })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarksResponse {
    pub industry: String,
    /// False when the industry is not listed and defaults were returned.
    pub listed: bool,
    pub benchmarks: BenchmarkSet,
}

async fn industry_benchmarks(
    State(state): State<AppState>,
    Path(industry): Path<String>,
) -> Json<BenchmarksResponse> {
    let manager = state.calculator.benchmarks();
    Json(BenchmarksResponse {
        listed: manager.has_industry(&industry),
        benchmarks: manager.get_all_benchmarks(&industry),
        industry,
    })
}

async fn calculate_kpis(
    State(state): State<AppState>,
    body: Result<Json<KpiInput>, JsonRejection>,
) -> ApiResult<KpiResults> {
    let Json(input) = body?;
    input.validate()?;

    let results = state.calculator.calculate_all_kpis(&input);
    warn_defaulted(&results);
    Ok(Json(results))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub profile: CompanyProfile,
    #[serde(default)]
    pub input: KpiInput,
}

async fn analyze_company(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<AnalysisResult> {
    let Json(request) = body?;
    request.profile.validate()?;
    request.input.validate()?;

    let result = analyze(&request.profile, &request.input, &state.calculator);
    warn_defaulted(&result.kpi_results);
    info!(
        company = %result.company_name,
        score = result.kpi_results.efficiency_score,
        "Analysis complete"
    );
    Ok(Json(result))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InefficiencyRequest {
    pub metrics: Vec<KpiMetric>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InefficiencyResponse {
    pub inefficiencies: Vec<Inefficiency>,
}

async fn find_inefficiencies(
    State(state): State<AppState>,
    body: Result<Json<InefficiencyRequest>, JsonRejection>,
) -> ApiResult<InefficiencyResponse> {
    let Json(request) = body?;
    Ok(Json(InefficiencyResponse {
        inefficiencies: state.calculator.identify_inefficiencies(&request.metrics),
    }))
}
