//! Content API handlers for publishing, updating, deleting, and listing
//! the departmental catalog.
//!
//! These handlers follow the thin controller pattern:
//! - Extract request parameters
//! - Validate input
//! - Delegate to ContentService
//! - Convert to HTTP response

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::content::service::{ContentService, MediaUpload, ServiceError};
use crate::modules::content::visibility::AnnotatedContent;
use crate::modules::directory::{Department, DepartmentSet};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Query parameters for the catalog.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub identity: Option<String>,
    pub department: Option<String>,
}

/// One catalog item, annotated with its view count.
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub media: Option<String>,
    pub media_original_name: Option<String>,
    pub media_type: Option<String>,
    pub author: String,
    pub departments: String,
    pub created_at: DateTime<Utc>,
    pub view_count: i64,
}

/// Response for the catalog listing.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub items: Vec<ContentItem>,
    pub total: usize,
}

/// Response after publishing content.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub id: i32,
    pub title: String,
    pub departments: String,
    pub media: Option<String>,
}

/// Body for updating title/body of an item.
#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub author: String,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Body for deleting an item.
#[derive(Debug, Deserialize)]
pub struct DeleteContentRequest {
    pub author: String,
}

impl From<AnnotatedContent> for ContentItem {
    fn from(annotated: AnnotatedContent) -> Self {
        let record = annotated.record;
        Self {
            id: record.id,
            title: record.title,
            body: record.body,
            media: record.media,
            media_original_name: record.media_original_name,
            media_type: record.media_type,
            author: record.author,
            departments: record.departments,
            created_at: record.created_at.into(),
            view_count: annotated.view_count,
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
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::DataIntegrity(msg) => ApiError::internal(msg),
            ServiceError::Media(e) => ApiError::internal(e.to_string()),
        }
    }
}

// ============================================================================
// Handlers (Thin Controllers)
// ============================================================================

/// GET /api/v1/content
pub async fn catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let identity = params
        .identity
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("identity required"))?;

    let department = params
        .department
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Department::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let service = ContentService::new(&state.db, &state.media);
    let items = service.catalog_for(identity, department).await?;

    let items: Vec<ContentItem> = items.into_iter().map(ContentItem::from).collect();
    let total = items.len();

    Ok(Json(CatalogResponse {
        success: true,
        items,
        total,
    }))
}

/// POST /api/v1/content
pub async fn publish(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PublishResponse>, ApiError> {
    info!("Content publish request received");

    // 1. Extract: Parse multipart form data
    let mut title = String::new();
    let mut body = String::new();
    let mut author: Option<String> = None;
    let mut departments: Option<String> = None;
    let mut media: Option<MediaUpload> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read title: {}", e)))?;
            }
            "body" => {
                body = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read body: {}", e)))?;
            }
            "author" => {
                author = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::validation(format!("Failed to read author: {}", e)))?,
                );
            }
            "departments" => {
                departments = Some(field.text().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read departments: {}", e))
                })?);
            }
            "media" => {
                let original_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file: {}", e)))?
                    .to_vec();

                if !bytes.is_empty() {
                    media = Some(MediaUpload {
                        original_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    // 2. Validate: author and department scope are required
    let author = author
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("author required"))?
        .to_string();

    let departments = departments
        .as_deref()
        .ok_or_else(|| ApiError::validation("departments required"))?;
    let departments =
        DepartmentSet::parse(departments).map_err(|e| ApiError::validation(e.to_string()))?;

    // 3. Delegate: Call service layer
    let service = ContentService::new(&state.db, &state.media);
    let model = service
        .publish(&author, title, body, departments, media)
        .await?;

    // 4. Respond: Convert to API response
    Ok(Json(PublishResponse {
        success: true,
        id: model.id,
        title: model.title,
        departments: model.departments,
        media: model.media,
    }))
}

/// PUT /api/v1/content/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<Value>, ApiError> {
    info!(id, "Content update request");

    let service = ContentService::new(&state.db, &state.media);
    let model = service
        .update(&request.author, id, request.title, request.body)
        .await?;

    Ok(Json(json!({"success": true, "id": model.id})))
}

/// DELETE /api/v1/content/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<DeleteContentRequest>,
) -> Result<Json<Value>, ApiError> {
    info!(id, "Content delete request");

    let service = ContentService::new(&state.db, &state.media);
    service.delete(&request.author, id).await?;

    Ok(Json(json!({"success": true, "id": id})))
}
