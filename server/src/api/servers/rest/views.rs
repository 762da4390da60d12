//! View accounting handlers: logging first views and reading the
//! per-content audit log.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::content::views::{ServiceError, ViewLedger};
use crate::modules::users::Authorizer;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Body for logging a view.
#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub viewer_email: Option<String>,
}

/// Query parameters for the audit log.
#[derive(Debug, Deserialize)]
pub struct ViewLogParams {
    pub admin: Option<String>,
}

/// One audit log entry.
#[derive(Debug, Serialize)]
pub struct ViewLogItem {
    pub viewer_email: String,
    pub viewed_at: DateTime<Utc>,
}

/// Response for the audit log.
#[derive(Debug, Serialize)]
pub struct ViewLogResponse {
    pub success: bool,
    pub content_id: i32,
    pub views: Vec<ViewLogItem>,
}

// ============================================================================
// Error Conversion
// ============================================================================

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => ApiError::internal(e.to_string()),
            ServiceError::InvalidInput(msg) => ApiError::validation(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
        }
    }
}

// ============================================================================
// Handlers (Thin Controllers)
// ============================================================================

/// POST /api/v1/content/{id}/view
pub async fn record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<RecordViewRequest>,
) -> Result<Json<Value>, ApiError> {
    let viewer = request.viewer_email.unwrap_or_default();

    let ledger = ViewLedger::new(&state.db);
    ledger.record_view(id, &viewer).await?;

    Ok(Json(json!({"success": true, "message": "View logged"})))
}

/// GET /api/v1/content/{id}/views
pub async fn log(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ViewLogParams>,
) -> Result<Json<ViewLogResponse>, ApiError> {
    let admin = params.admin.unwrap_or_default();

    let is_admin = Authorizer::new(&state.db)
        .is_admin(&admin)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let ledger = ViewLedger::new(&state.db);
    let entries = ledger.view_log(id, is_admin).await?;

    info!(content_id = id, total = entries.len(), "View log requested");

    Ok(Json(ViewLogResponse {
        success: true,
        content_id: id,
        views: entries
            .into_iter()
            .map(|e| ViewLogItem {
                viewer_email: e.viewer_email,
                viewed_at: e.viewed_at,
            })
            .collect(),
    }))
}
