//! API handlers for the migration server
//!
//! - `GET /health`
//! - `GET /api/rules` lists the registered rules
//! - `POST /api/migrate` runs the rule pipeline over a code fragment

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use migrate_engine::{MigrationEngine, RuleInfo};
use migrate_types::MigrateResponse;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ApiError, ServerError};
use crate::validation::parse_migrate_request;
use crate::{AppState, X_REQUEST_ID};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "migrate-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /api/rules
pub async fn handle_list_rules(State(state): State<AppState>) -> Json<Vec<RuleInfo>> {
    Json(state.catalog.describe())
}

/// Handler: POST /api/migrate
pub async fn handle_migrate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MigrateResponse>, ApiError> {
    let request_id = request_id(&headers);

    let Json(body) = body.map_err(|rejection| {
        let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge
        } else {
            ServerError::MalformedBody(rejection.body_text())
        };
        err.with_request_id(&request_id)
    })?;

    let req = parse_migrate_request(&body)
        .map_err(|issues| ServerError::Validation { issues }.with_request_id(&request_id))?;

    info!(
        request_id = %request_id,
        source = %req.source_language,
        bytes = req.code.len(),
        "Migrate request"
    );

    // Rule scans are CPU-bound; keep them off the async workers
    let catalog = state.catalog;
    let response = tokio::task::spawn_blocking(move || {
        MigrationEngine::with_catalog(catalog).migrate(&req)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()).with_request_id(&request_id))?;

    debug!(
        request_id = %request_id,
        rules_applied = response.report.summary.rules_applied,
        warnings = response.report.summary.warnings,
        "Migrate response"
    );

    Ok(Json(response))
}

/// Correlation id set by the request-id middleware
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
