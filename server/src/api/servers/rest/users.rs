//! User administration handlers.
//!
//! Every operation here is admin-gated: the caller names itself in the
//! `admin` field/parameter and the Authorizer checks the stored role.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use entity::user;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::directory::Department;
use crate::modules::users::service::{NewUser, ServiceError, UserService};
use crate::modules::users::{Authorizer, Role};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Query parameters for the user listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub admin: Option<String>,
    pub q: Option<String>,
}

/// One account, without the credential.
#[derive(Debug, Serialize)]
pub struct UserItem {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub department: String,
    pub blocked_until: Option<DateTime<Utc>>,
}

/// Response for the user listing.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserItem>,
    pub total: usize,
}

/// Body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub admin: Option<String>,
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub username: Option<String>,
    pub department: Option<String>,
}

/// Body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub admin: Option<String>,
    pub new_username: Option<String>,
    pub new_password: Option<String>,
}

/// Body for blocking an account.
#[derive(Debug, Deserialize)]
pub struct BlockUserRequest {
    pub admin: Option<String>,
    pub minutes: i64,
}

/// Body for unblocking an account.
#[derive(Debug, Deserialize)]
pub struct UnblockUserRequest {
    pub admin: Option<String>,
}

impl From<user::Model> for UserItem {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            department: user.department,
            blocked_until: user.blocked_until.map(Into::into),
        }
    }
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
            ServiceError::EmailTaken(msg) => ApiError::conflict(msg),
            ServiceError::InvalidCredentials => {
                ApiError::unauthorized("Invalid email or password")
            }
            ServiceError::Blocked(until) => {
                ApiError::forbidden(format!("Account blocked until {}", until))
            }
        }
    }
}

// ============================================================================
// Handlers (Thin Controllers)
// ============================================================================

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<UsersResponse>, ApiError> {
    ensure_admin(&state.db, params.admin.as_deref()).await?;

    let service = UserService::new(&state.db);
    let users = service.list(params.q.as_deref()).await?;

    let users: Vec<UserItem> = users.into_iter().map(UserItem::from).collect();
    let total = users.len();

    Ok(Json(UsersResponse {
        success: true,
        users,
        total,
    }))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&state.db, request.admin.as_deref()).await?;

    let role = Role::parse(&request.role)
        .ok_or_else(|| ApiError::validation(format!("unknown role: {}", request.role)))?;

    let department = request
        .department
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Department::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let service = UserService::new(&state.db);
    let model = service
        .create(NewUser {
            id: request.id,
            email: request.email,
            password: request.password,
            role,
            username: request.username,
            department,
        })
        .await?;

    info!(user_id = %model.id, "User created via API");

    Ok(Json(json!({"success": true, "id": model.id})))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&state.db, request.admin.as_deref()).await?;

    let service = UserService::new(&state.db);
    let model = service
        .update(
            &id,
            request.new_username.as_deref(),
            request.new_password.as_deref(),
        )
        .await?;

    Ok(Json(json!({"success": true, "id": model.id})))
}

/// POST /api/v1/users/{id}/block
pub async fn block(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<BlockUserRequest>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&state.db, request.admin.as_deref()).await?;

    let service = UserService::new(&state.db);
    let model = service.block(&id, request.minutes).await?;

    Ok(Json(json!({
        "success": true,
        "id": model.id,
        "blocked_until": model.blocked_until.map(DateTime::<Utc>::from),
    })))
}

/// POST /api/v1/users/{id}/unblock
pub async fn unblock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UnblockUserRequest>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&state.db, request.admin.as_deref()).await?;

    let service = UserService::new(&state.db);
    let model = service.unblock(&id).await?;

    Ok(Json(json!({"success": true, "id": model.id})))
}

/// Resolve the caller's admin claim against the stored role.
async fn ensure_admin(db: &DatabaseConnection, admin: Option<&str>) -> Result<(), ApiError> {
    let email = admin
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("admin identity required"))?;

    match Authorizer::new(db).is_admin(email).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ApiError::forbidden("Admin only")),
        Err(e) => Err(ApiError::internal(e.to_string())),
    }
}
