//! Login handler.
//!
//! There are no server-side sessions: a successful login returns the
//! account record (sans credential) and the client passes its identity
//! explicitly on subsequent calls.

use axum::extract::State;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::users::service::UserService;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated account, without the credential.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub department: String,
    pub blocked_until: Option<DateTime<Utc>>,
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::validation("email and password required"));
    }

    info!(email = %request.email, "Login request");

    let service = UserService::new(&state.db);
    let user = service.authenticate(&request.email, &request.password).await?;

    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        role: user.role,
        department: user.department,
        blocked_until: user.blocked_until.map(Into::into),
    }))
}
