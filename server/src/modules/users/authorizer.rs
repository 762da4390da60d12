//! Role-backed authorization.
//!
//! Administrator privilege is decided by the stored `role` column and
//! nowhere else; every admin-gated operation funnels through this type.

use entity::user;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

/// Account role stored on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Capability deciding whether an identity holds administrator rights.
pub struct Authorizer<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> Authorizer<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the account behind `email` carries the admin role.
    ///
    /// Unknown identities are not administrators.
    pub async fn is_admin(&self, email: &str) -> Result<bool, DbErr> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(false);
        }

        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(user.as_ref().map(Self::grants_admin).unwrap_or(false))
    }

    /// Role check on an already-loaded row.
    pub fn grants_admin(user: &user::Model) -> bool {
        Role::parse(&user.role) == Some(Role::Admin)
    }
}
