//! Test server and database setup plus seeding helpers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::Router;
use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};
use tempfile::TempDir;

use server::api::servers::app_state::AppState;
use server::api::servers::rest;
use server::bootstrap::config::{Config, CorsConfig, DbConfig, ServerConfig, UploadConfig};
use server::modules::storage::MediaStore;

/// Test server container with access to all components.
pub struct TestServer {
    pub router: Router,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
    pub temp: TempDir,
}

/// Setup a test server with app state.
pub async fn setup_test_server() -> TestServer {
    let temp = TempDir::new().unwrap();
    let db = setup_test_database(&temp).await;
    let config = create_test_config(&temp);

    let media = MediaStore::new(&config.upload).unwrap();
    let app_state = AppState::new(db.clone(), Arc::new(media));
    let router = rest::build_router(app_state, &config);

    TestServer {
        router,
        db,
        upload_dir: config.upload.dir.clone(),
        temp,
    }
}

/// Setup just a test database (no router) - useful for testing services.
pub async fn setup_test_db() -> (DatabaseConnection, TempDir) {
    let temp = TempDir::new().unwrap();
    let db = setup_test_database(&temp).await;
    (db, temp)
}

async fn setup_test_database(temp: &TempDir) -> DatabaseConnection {
    let db_path = temp.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = Database::connect(&db_url).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    db
}

fn create_test_config(temp: &TempDir) -> Config {
    Config {
        db: DbConfig {
            url: format!("sqlite://{}?mode=rwc", temp.path().join("test.db").display()),
            max_connections: 50,
            min_connections: 1,
            connect_timeout: StdDuration::from_secs(8),
            idle_timeout: StdDuration::from_secs(600),
            max_lifetime: StdDuration::from_secs(1800),
            logging_enabled: false,
        },
        server: ServerConfig {
            rest_port: 3000,
            host: "0.0.0.0".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: false,
        },
        upload: UploadConfig {
            dir: temp.path().join("uploads"),
        },
    }
}

// ============================================================================
// Seeding helpers
// ============================================================================

pub async fn seed_user(
    db: &DatabaseConnection,
    id: &str,
    email: &str,
    role: &str,
    department: &str,
) -> entity::user::Model {
    entity::user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        password: Set("secret".to_string()),
        role: Set(role.to_string()),
        username: Set(id.to_string()),
        department: Set(department.to_string()),
        blocked_until: Set(None),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_admin(db: &DatabaseConnection) -> entity::user::Model {
    seed_user(db, "admin", "admin@example.edu", "admin", "CSE").await
}

/// Insert a content record directly. `age_secs` pushes `created_at` into
/// the past so ordering tests get distinct timestamps.
pub async fn seed_content(
    db: &DatabaseConnection,
    title: &str,
    departments: &str,
    age_secs: i64,
) -> entity::content::Model {
    entity::content::ActiveModel {
        title: Set(title.to_string()),
        body: Set(format!("{title} body")),
        media: Set(None),
        media_original_name: Set(None),
        media_type: Set(None),
        author: Set("admin@example.edu".to_string()),
        departments: Set(departments.to_string()),
        created_at: Set((Utc::now() - Duration::seconds(age_secs)).into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Insert a view event directly with an explicit timestamp.
pub async fn seed_view(
    db: &DatabaseConnection,
    content_id: i32,
    viewer_email: &str,
    age_secs: i64,
) -> entity::content_view::Model {
    entity::content_view::ActiveModel {
        content_id: Set(content_id),
        viewer_email: Set(viewer_email.to_string()),
        viewed_at: Set((Utc::now() - Duration::seconds(age_secs)).into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
