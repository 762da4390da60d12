//! REST API router configuration.
//!
//! This module contains route definitions and server startup logic.
//! All handler implementations are in their respective submodules.

mod auth;
mod content;
mod health;
mod users;
mod views;

use crate::api::servers::app_state::AppState;
use crate::bootstrap::config::Config;
use axum::routing::{get, post, put};
use axum::Router;
use errors::AppError;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

/// Build the REST API router with all routes.
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config);
    let api = "/api/v1";

    Router::new()
        // Health
        .route(&format!("{api}/health"), get(health::check))
        // Login
        .route(&format!("{api}/login"), post(auth::login))
        // Content catalog
        .route(
            &format!("{api}/content"),
            get(content::catalog).post(content::publish),
        )
        .route(
            &format!("{api}/content/{{id}}"),
            put(content::update).delete(content::remove),
        )
        // View accounting
        .route(&format!("{api}/content/{{id}}/view"), post(views::record))
        .route(&format!("{api}/content/{{id}}/views"), get(views::log))
        // User administration
        .route(
            &format!("{api}/users"),
            get(users::list).post(users::create),
        )
        .route(&format!("{api}/users/{{id}}"), put(users::update))
        .route(&format!("{api}/users/{{id}}/block"), post(users::block))
        .route(&format!("{api}/users/{{id}}/unblock"), post(users::unblock))
        // Stored media attachments
        .nest_service("/uploads", ServeDir::new(&config.upload.dir))
        .with_state(app_state)
        .layer(cors)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if config.cors.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors
}

/// Start the REST server.
pub async fn start(app_state: &AppState, config: &Config) -> Result<(), AppError> {
    let app = build_router(app_state.clone(), config);
    let bind_addr = format!("{}:{}", config.server.host, config.server.rest_port);

    info!("Starting REST server on {}", &bind_addr);
    info!("CORS allowed origins: {:?}", config.cors.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
