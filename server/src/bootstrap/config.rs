//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use errors::AppError;

use crate::utils::env::{env_bool, env_path, env_string, env_u16, env_u32, env_duration_secs};

/// Aggregated application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub logging_enabled: bool,
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_port: u16,
    pub host: String,
}

/// CORS settings for the browser client.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Media upload storage settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where attachment files are stored and served from
    pub dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// suitable for local development.
    pub fn from_env() -> Result<Self, AppError> {
        let url = env_string("DATABASE_URL", "sqlite://noticeboard.db?mode=rwc");
        if url.trim().is_empty() {
            return Err(AppError::Config("DATABASE_URL must not be empty".to_string()));
        }

        Ok(Self {
            db: DbConfig {
                url,
                max_connections: env_u32("DB_MAX_CONNECTIONS", 50),
                min_connections: env_u32("DB_MIN_CONNECTIONS", 1),
                connect_timeout: env_duration_secs("DB_CONNECT_TIMEOUT_SECS", 8),
                idle_timeout: env_duration_secs("DB_IDLE_TIMEOUT_SECS", 600),
                max_lifetime: env_duration_secs("DB_MAX_LIFETIME_SECS", 1800),
                logging_enabled: env_bool("DB_LOGGING_ENABLED", false),
            },
            server: ServerConfig {
                rest_port: env_u16("REST_PORT", 3000),
                host: env_string("HOST", "0.0.0.0"),
            },
            cors: CorsConfig {
                allowed_origins: env_string("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_bool("CORS_ALLOW_CREDENTIALS", false),
            },
            upload: UploadConfig {
                dir: env_path("UPLOAD_DIR", "uploads"),
            },
        })
    }
}
