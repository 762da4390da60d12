//! Shared application state.
//!
//! Handlers receive explicit handles to the database and the media store;
//! there is no ambient global state.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::modules::storage::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, media: Arc<MediaStore>) -> Self {
        Self { db, media }
    }
}
