use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::{ApiCalculatorEntry, ApiDiagnoseRequest, ApiDiagnoseResponse};
use ads_metrics::{diagnose, CalculatorId, MetricResult, MetricsConfig, MetricsError};

#[derive(Clone)]
struct AppState {
    config: Arc<MetricsConfig>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn serve(args: crate::ServeArgs, config: MetricsConfig) -> Result<(), MetricsError> {
    let state = AppState {
        config: Arc::new(config),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(&web_root).not_found_service(ServeFile::new(index_path));

    let app = router(state).fallback_service(static_service);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| MetricsError::Server(format!("invalid bind address: {}", err)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| MetricsError::Server(format!("failed to bind server: {}", err)))?;
    tracing::info!(%addr, web_root = %web_root, "serving metrics api");

    axum::serve(listener, app)
        .await
        .map_err(|err| MetricsError::Server(err.to_string()))?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/calculators", get(list_handler))
        .route("/api/calculators/:tab", post(calculate_handler))
        .route("/api/diagnose", post(diagnose_handler))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn list_handler() -> ApiResult<Vec<ApiCalculatorEntry>> {
    let entries = CalculatorId::all()
        .map(ApiCalculatorEntry::from_id)
        .collect::<Result<Vec<_>, _>>()
        .map_err(error_response)?;
    Ok(Json(entries))
}

async fn calculate_handler(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Json(fields): Json<Value>,
) -> ApiResult<MetricResult> {
    let id = CalculatorId::from_tab(&tab)
        .ok_or_else(|| error_response(MetricsError::UnknownCalculator(tab.clone())))?;
    let result = ads_metrics::compute(id, fields, &state.config).map_err(error_response)?;
    tracing::debug!(calculator = id.tab(), "computed");
    Ok(Json(result))
}

async fn diagnose_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<ApiDiagnoseResponse> {
    let request = ApiDiagnoseRequest::from_json(body).map_err(error_response)?;
    let diagnosis = diagnose(&request.into_snapshot(), &state.config.diagnosis);
    tracing::debug!(
        recommendations = diagnosis.recommendations.len(),
        "diagnosis evaluated"
    );
    Ok(Json(ApiDiagnoseResponse::from_diagnosis(diagnosis)))
}

fn error_response(err: MetricsError) -> (StatusCode, String) {
    let status = match err {
        MetricsError::UnknownCalculator(_) => StatusCode::NOT_FOUND,
        MetricsError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (status, err.to_string())
}
