//! View ledger: deduplicated first-view accounting.
//!
//! At most one event is recorded per (content, viewer) pair. Uniqueness
//! is enforced by the store's unique index plus a conflict-free insert,
//! so two concurrent attempts for the same pair both succeed and exactly
//! one row persists. Counts are always derived from the events, never
//! cached on the content record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{content, content_view};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::{debug, info};

// ============================================================================
// Service Error Types
// ============================================================================

/// Errors that can occur in view ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

// ============================================================================
// Domain Types
// ============================================================================

/// One entry of the per-content audit log.
#[derive(Debug, Clone)]
pub struct ViewLogEntry {
    pub viewer_email: String,
    pub viewed_at: DateTime<Utc>,
}

// ============================================================================
// View Ledger
// ============================================================================

/// Service tracking first views per (content, viewer) pair.
pub struct ViewLedger<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ViewLedger<'a> {
    /// Create a new view ledger instance.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record that `viewer` has seen `content_id`.
    ///
    /// Idempotent: a repeated call for the same pair succeeds without
    /// creating a second event. The duplicate-insert race between two
    /// concurrent calls is resolved by the store's unique index; the
    /// losing insert is absorbed here as a no-op.
    pub async fn record_view(&self, content_id: i32, viewer: &str) -> Result<(), ServiceError> {
        let viewer = viewer.trim();
        if viewer.is_empty() {
            return Err(ServiceError::InvalidInput(
                "viewer_email required".to_string(),
            ));
        }

        if content::Entity::find_by_id(content_id)
            .one(self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(format!("Content {}", content_id)));
        }

        let event = content_view::ActiveModel {
            content_id: Set(content_id),
            viewer_email: Set(viewer.to_string()),
            viewed_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let insert = content_view::Entity::insert(event)
            .on_conflict(
                OnConflict::columns([
                    content_view::Column::ContentId,
                    content_view::Column::ViewerEmail,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(self.db)
            .await;

        match insert {
            Ok(_) => {
                info!(content_id, viewer = %viewer, "View logged");
                Ok(())
            }
            // The pair already has an event; the second attempt is a no-op.
            Err(DbErr::RecordNotInserted) => {
                debug!(content_id, viewer = %viewer, "View already logged");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Derived view counts: content id → number of distinct viewers.
    ///
    /// Content with zero events is absent from the map; callers default
    /// missing entries to 0.
    pub async fn counts_by_content(&self) -> Result<HashMap<i32, i64>, DbErr> {
        let rows: Vec<(i32, i64)> = content_view::Entity::find()
            .select_only()
            .column(content_view::Column::ContentId)
            .column_as(content_view::Column::Id.count(), "view_count")
            .group_by(content_view::Column::ContentId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// The audit log for one content item, newest view first.
    ///
    /// Administrator-only.
    pub async fn view_log(
        &self,
        content_id: i32,
        requester_is_admin: bool,
    ) -> Result<Vec<ViewLogEntry>, ServiceError> {
        if !requester_is_admin {
            return Err(ServiceError::Forbidden(
                "view logs are restricted to administrators".to_string(),
            ));
        }

        let rows = content_view::Entity::find()
            .filter(content_view::Column::ContentId.eq(content_id))
            .order_by_desc(content_view::Column::ViewedAt)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ViewLogEntry {
                viewer_email: row.viewer_email,
                viewed_at: row.viewed_at.into(),
            })
            .collect())
    }
}
