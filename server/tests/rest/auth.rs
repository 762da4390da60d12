//! Integration tests for the login endpoint.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel};
use serde_json::json;

use crate::helpers::*;
use crate::init::{seed_user, setup_test_server};

#[tokio::test]
async fn login_returns_account_without_credential() {
    let server = setup_test_server().await;
    seed_user(&server.db, "m1", "member@example.edu", "user", "ECE").await;

    let (status, body) = post_request(
        &server.router,
        "/api/v1/login",
        json!({"email": "member@example.edu", "password": "secret"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"].as_str(), Some("member@example.edu"));
    assert_eq!(body["role"].as_str(), Some("user"));
    assert_eq!(body["department"].as_str(), Some("ECE"));
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let server = setup_test_server().await;
    seed_user(&server.db, "m1", "member@example.edu", "user", "CSE").await;

    let (status, _) = post_request(
        &server.router,
        "/api/v1/login",
        json!({"email": "member@example.edu", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown email reads the same as a wrong password.
    let (status, _) = post_request(
        &server.router,
        "/api/v1/login",
        json!({"email": "ghost@example.edu", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let server = setup_test_server().await;

    let (status, _) = post_request(
        &server.router,
        "/api/v1/login",
        json!({"email": "", "password": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_respects_block_expiry() {
    let server = setup_test_server().await;
    let user = seed_user(&server.db, "m1", "member@example.edu", "user", "CSE").await;

    // Active block: rejected.
    let mut active = user.clone().into_active_model();
    active.blocked_until = Set(Some((Utc::now() + Duration::minutes(10)).into()));
    active.update(&server.db).await.unwrap();

    let (status, _) = post_request(
        &server.router,
        "/api/v1/login",
        json!({"email": "member@example.edu", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Expired block: back in.
    let stored = entity::user::Entity::find_by_id("m1")
        .one(&server.db)
        .await
        .unwrap()
        .unwrap();
    let mut active = stored.into_active_model();
    active.blocked_until = Set(Some((Utc::now() - Duration::minutes(10)).into()));
    active.update(&server.db).await.unwrap();

    let (status, _) = post_request(
        &server.router,
        "/api/v1/login",
        json!({"email": "member@example.edu", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
