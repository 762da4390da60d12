//! Entity for first-view events.
//!
//! At most one row exists per (content, viewer) pair; the unique index
//! created by the migration is what makes duplicate logging a no-op.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "content_views")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub content_id: i32,

    pub viewer_email: String,

    /// Timestamp of the first view; never updated afterwards
    pub viewed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
