//! Application-level error type shared across the workspace.
//!
//! Domain services define their own error enums; `AppError` covers
//! process-level wiring: configuration, storage setup, migrations, and
//! server startup.

use thiserror::Error;

/// Boxed error source for storage and migration failures.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(BoxedError),

    #[error("Migration error: {0}")]
    Migration(BoxedError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}
