//! Entity for published content items.
//!
//! Each item carries the text payload, an optional media attachment, and
//! the normalized department scope controlling who may see it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display title, may be empty
    pub title: String,

    /// Text body, may be empty
    pub body: String,

    /// Opaque stored filename of the attachment, if any
    pub media: Option<String>,

    /// Original filename as uploaded
    pub media_original_name: Option<String>,

    /// MIME type of the attachment
    pub media_type: Option<String>,

    /// Email of the publishing administrator
    pub author: String,

    /// Normalized uppercase, comma-joined department labels (or ALL)
    pub departments: String,

    /// When the item was published; catalog sort key, descending
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
