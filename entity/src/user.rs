//! Entity for user accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Account identifier chosen by the creating administrator
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login key; exactly one account per email
    #[sea_orm(unique)]
    pub email: String,

    /// Opaque credential, compared verbatim at login
    pub password: String,

    /// "admin" or "user"; admin checks go through the role column
    pub role: String,

    /// Display name, defaults to the account id
    pub username: String,

    /// One label from the closed department vocabulary
    pub department: String,

    /// Account is blocked while this lies in the future
    pub blocked_until: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
