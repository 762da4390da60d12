//! Content service layer for API business logic.
//!
//! This service encapsulates business logic for content operations,
//! keeping REST handlers thin and focused on HTTP concerns. Visibility
//! filtering lives in `visibility.rs`, view accounting in `views.rs`.

use chrono::Utc;
use entity::{content, content_view, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder,
};
use tracing::info;

use crate::modules::content::views::ViewLedger;
use crate::modules::content::visibility::{self, AnnotatedContent};
use crate::modules::directory::{Department, DepartmentSet};
use crate::modules::storage::{MediaError, MediaStore};
use crate::modules::users::Authorizer;

// ============================================================================
// Service Error Types
// ============================================================================

/// Errors that can occur in content service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Media storage error: {0}")]
    Media(#[from] MediaError),
}

// ============================================================================
// Domain Types
// ============================================================================

/// An uploaded attachment, as extracted from the multipart request.
#[derive(Debug)]
pub struct MediaUpload {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ============================================================================
// Content Service
// ============================================================================

/// Service for content-related business logic.
pub struct ContentService<'a> {
    db: &'a DatabaseConnection,
    media: &'a MediaStore,
}

impl<'a> ContentService<'a> {
    /// Create a new content service instance.
    pub fn new(db: &'a DatabaseConnection, media: &'a MediaStore) -> Self {
        Self { db, media }
    }

    /// Publish a content item.
    ///
    /// Only administrators may publish. The attachment, if any, is
    /// persisted first so the stored record never references a file that
    /// does not exist.
    pub async fn publish(
        &self,
        author: &str,
        title: String,
        body: String,
        departments: DepartmentSet,
        media: Option<MediaUpload>,
    ) -> Result<content::Model, ServiceError> {
        self.require_admin(author, "only administrators may publish content")
            .await?;

        let stored = match media {
            Some(upload) => {
                let name = self
                    .media
                    .save(upload.original_name.as_deref(), &upload.bytes)?;
                Some((name, upload.original_name, upload.content_type))
            }
            None => None,
        };

        let record = content::ActiveModel {
            title: Set(title),
            body: Set(body),
            media: Set(stored.as_ref().map(|(name, _, _)| name.clone())),
            media_original_name: Set(stored.as_ref().and_then(|(_, orig, _)| orig.clone())),
            media_type: Set(stored.as_ref().and_then(|(_, _, mime)| mime.clone())),
            author: Set(author.trim().to_string()),
            departments: Set(departments.encode()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let model = record.insert(self.db).await?;

        info!(
            id = model.id,
            author = %model.author,
            departments = %model.departments,
            has_media = model.media.is_some(),
            "Content published"
        );
        Ok(model)
    }

    /// Update the title and body of an existing item.
    pub async fn update(
        &self,
        author: &str,
        id: i32,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<content::Model, ServiceError> {
        self.require_admin(author, "only administrators may edit content")
            .await?;

        let existing = self.find(id).await?;

        let mut active: content::ActiveModel = existing.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(body) = body {
            active.body = Set(body);
        }
        let model = active.update(self.db).await?;

        info!(id = model.id, author = %author, "Content updated");
        Ok(model)
    }

    /// Delete an item, its view events, and its media file.
    pub async fn delete(&self, author: &str, id: i32) -> Result<(), ServiceError> {
        self.require_admin(author, "only administrators may delete content")
            .await?;

        let existing = self.find(id).await?;
        let media = existing.media.clone();

        content_view::Entity::delete_many()
            .filter(content_view::Column::ContentId.eq(id))
            .exec(self.db)
            .await?;
        existing.delete(self.db).await?;

        if let Some(stored_name) = media {
            self.media.remove(&stored_name)?;
        }

        info!(id, author = %author, "Content deleted");
        Ok(())
    }

    /// The catalog as seen by `identity`, annotated with view counts.
    ///
    /// The admin flag comes from the identity's stored role; the
    /// department from the explicit override, falling back to the
    /// identity's stored department.
    pub async fn catalog_for(
        &self,
        identity: &str,
        department: Option<Department>,
    ) -> Result<Vec<AnnotatedContent>, ServiceError> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(ServiceError::InvalidInput("identity required".to_string()));
        }

        let requester = user::Entity::find()
            .filter(user::Column::Email.eq(identity))
            .one(self.db)
            .await?;

        let is_admin = requester
            .as_ref()
            .map(Authorizer::grants_admin)
            .unwrap_or(false);

        let department = match (department, requester) {
            (Some(dept), _) => dept,
            (None, Some(user)) => Department::parse(&user.department).map_err(|err| {
                ServiceError::DataIntegrity(format!(
                    "user {} has an invalid department: {}",
                    user.id, err
                ))
            })?,
            (None, None) => {
                return Err(ServiceError::InvalidInput(format!(
                    "unknown identity {identity} and no department given"
                )));
            }
        };

        let catalog = content::Entity::find()
            .order_by_desc(content::Column::CreatedAt)
            .all(self.db)
            .await?;
        let counts = ViewLedger::new(self.db).counts_by_content().await?;

        Ok(visibility::resolve(department, is_admin, catalog, &counts))
    }

    async fn require_admin(&self, author: &str, denial: &str) -> Result<(), ServiceError> {
        if !Authorizer::new(self.db).is_admin(author).await? {
            return Err(ServiceError::Forbidden(denial.to_string()));
        }
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<content::Model, ServiceError> {
        content::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Content {}", id)))
    }
}
