//! FILENAME: app/src/server.rs
// PURPOSE: HTTP mode. `POST /generate-files` runs one report per request.
// CONTEXT: Each request reads the config file and writes into its own
// `<output_dir>/<request_id>/` directory, so concurrent requests share
// nothing mutable.

use std::path::PathBuf;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use persistence::LoadError;
use pivot_engine::PivotError;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::load_config;
use crate::controller::process_payload;
use crate::error::ReportError;
use crate::logging::{log_error, log_info, log_warn};

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Status code for a failed run. Problems with the request body are the
/// caller's; a broken server config or a failed write are ours.
pub fn status_for(err: &ReportError) -> StatusCode {
    match err {
        ReportError::Pivot(PivotError::Schema { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportError::Pivot(PivotError::InvalidConfig(_)) => StatusCode::BAD_REQUEST,
        ReportError::Load(LoadError::MalformedPayload(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

fn is_empty_payload(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// `POST /generate-files`. The body is a `{"data": ...}` object, a row array
/// or a column object. A run whose filters leave no rows answers 200 with
/// null file paths.
pub async fn generate_files(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            log_warn!("API", "rejected body: {}", rejection.body_text());
            return error_body(StatusCode::BAD_REQUEST, "No JSON data provided");
        }
    };
    if is_empty_payload(&body) || body.get("data").map_or(false, is_empty_payload) {
        return error_body(StatusCode::BAD_REQUEST, "No JSON data provided");
    }

    let request_id = Uuid::new_v4().to_string();
    let out_dir = state.output_dir.join(&request_id);
    log_info!("API", "request {} -> {}", request_id, out_dir.display());

    let config_path = state.config_path.clone();
    let run = tokio::task::spawn_blocking(move || -> Result<_, ReportError> {
        let config = load_config(&config_path, false)?;
        process_payload(&config, &body, &out_dir)
    })
    .await;

    match run {
        Ok(Ok(Some(artifacts))) => (
            StatusCode::OK,
            Json(json!({
                "request_id": request_id,
                "pdf_file": artifacts.pdf_file.display().to_string(),
                "excel_file": artifacts.excel_file.display().to_string(),
            })),
        ),
        Ok(Ok(None)) => (
            StatusCode::OK,
            Json(json!({
                "request_id": request_id,
                "pdf_file": Value::Null,
                "excel_file": Value::Null,
            })),
        ),
        Ok(Err(err)) => {
            let status = status_for(&err);
            log_error!("API", "request {} failed ({}): {}", request_id, status, err);
            error_body(status, err.to_string())
        }
        Err(join_err) => {
            log_error!("API", "request {} panicked: {}", request_id, join_err);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "report worker failed")
        }
    }
}

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate-files", post(generate_files))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, state: ServerState) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log_info!("API", "listening on http://{}", addr);
    axum::serve(listener, app).await
}
