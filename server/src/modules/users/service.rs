//! User service layer for account administration and login.
//!
//! This service encapsulates business logic for user operations,
//! keeping REST handlers thin and focused on HTTP concerns.

use chrono::{DateTime, Duration, Utc};
use entity::user;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use tracing::info;

use crate::modules::directory::Department;
use crate::modules::users::authorizer::Role;

// ============================================================================
// Service Error Types
// ============================================================================

/// Errors that can occur in user service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account blocked until {0}")]
    Blocked(DateTime<Utc>),
}

// ============================================================================
// Domain Types
// ============================================================================

/// Fields required to create an account.
#[derive(Debug)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub username: Option<String>,
    pub department: Option<Department>,
}

// ============================================================================
// User Service
// ============================================================================

/// Service for account-related business logic.
pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Create a new user service instance.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verify credentials and the block status of an account.
    ///
    /// The stored credential is compared verbatim. A valid login against
    /// a blocked account reports the block expiry; an expired block does
    /// not get in the way.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim()))
            .one(self.db)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if user.password != password {
            return Err(ServiceError::InvalidCredentials);
        }

        if let Some(until) = user.blocked_until {
            let until: DateTime<Utc> = until.into();
            if until > Utc::now() {
                return Err(ServiceError::Blocked(until));
            }
        }

        info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    /// List accounts ordered by (department, id), optionally filtered by
    /// a case-insensitive substring match on email or username.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<user::Model>, ServiceError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Department)
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await?;

        let Some(needle) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(users);
        };

        let needle = needle.to_lowercase();
        Ok(users
            .into_iter()
            .filter(|u| {
                u.email.to_lowercase().contains(&needle)
                    || u.username.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Create an account.
    ///
    /// Username defaults to the account id, department to CSE.
    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, ServiceError> {
        let id = required(&new_user.id, "id")?;
        let email = required(&new_user.email, "email")?;
        let password = required(&new_user.password, "password")?;

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::EmailTaken(email));
        }

        let username = new_user
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| id.clone());
        let department = new_user.department.unwrap_or(Department::Cse);

        let record = user::ActiveModel {
            id: Set(id.clone()),
            email: Set(email),
            password: Set(password),
            role: Set(new_user.role.as_str().to_string()),
            username: Set(username),
            department: Set(department.as_str().to_string()),
            blocked_until: Set(None),
        };

        let model = record.insert(self.db).await?;

        info!(user_id = %model.id, role = %model.role, department = %model.department, "User created");
        Ok(model)
    }

    /// Apply a partial update; only non-empty fields change anything.
    pub async fn update(
        &self,
        id: &str,
        new_username: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<user::Model, ServiceError> {
        let user = self.find(id).await?;

        let mut active: user::ActiveModel = user.into();
        if let Some(username) = new_username.map(str::trim).filter(|u| !u.is_empty()) {
            active.username = Set(username.to_string());
        }
        if let Some(password) = new_password.filter(|p| !p.is_empty()) {
            active.password = Set(password.to_string());
        }
        let model = active.update(self.db).await?;

        info!(user_id = %model.id, "User updated");
        Ok(model)
    }

    /// Block an account for the given number of minutes from now.
    pub async fn block(&self, id: &str, minutes: i64) -> Result<user::Model, ServiceError> {
        if minutes <= 0 {
            return Err(ServiceError::InvalidInput(
                "block duration must be a positive number of minutes".to_string(),
            ));
        }

        let user = self.find(id).await?;
        let until = Utc::now() + Duration::minutes(minutes);

        let mut active: user::ActiveModel = user.into();
        active.blocked_until = Set(Some(until.into()));
        let model = active.update(self.db).await?;

        info!(user_id = %model.id, until = %until, "User blocked");
        Ok(model)
    }

    /// Clear an account's block.
    pub async fn unblock(&self, id: &str) -> Result<user::Model, ServiceError> {
        let user = self.find(id).await?;

        let mut active: user::ActiveModel = user.into();
        active.blocked_until = Set(None);
        let model = active.update(self.db).await?;

        info!(user_id = %model.id, "User unblocked");
        Ok(model)
    }

    async fn find(&self, id: &str) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}

fn required(value: &str, field: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} required")));
    }
    Ok(value.to_string())
}
