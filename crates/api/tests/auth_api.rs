//! Requests without a valid actor are rejected before touching the database.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, lazy_pool, patch_auth, post_multipart, Part};

async fn assert_unauthorized(response: axum::http::Response<axum::body::Body>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthorized action.");
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn settings_update_without_token_is_unauthorized() {
    let app = build_test_app(lazy_pool()).await.app;

    let response = post_multipart(
        app,
        "/api/v1/settings-update",
        None,
        &[Part::Text("name", "Acme"), Part::Text("active", "true")],
    )
    .await;

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn role_switch_without_token_is_unauthorized() {
    let app = build_test_app(lazy_pool()).await.app;

    let response = patch_auth(app, "/api/v1/roles/2/default", None).await;

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn activity_logs_without_token_is_unauthorized() {
    let app = build_test_app(lazy_pool()).await.app;

    let response = get(app, "/api/v1/activity-logs").await;

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn invalid_token_is_treated_as_unauthenticated() {
    let test = build_test_app(lazy_pool()).await;

    let response = get_auth(test.app.clone(), "/api/v1/activity-logs", "not-a-jwt").await;
    assert_unauthorized(response).await;

    let response = patch_auth(test.app, "/api/v1/roles/2/default", Some("not-a-jwt")).await;
    assert_unauthorized(response).await;
}
