//! Version guard behaviour through a real router.

mod common;

use std::fs;

use axum::body::Body;
use axum::http::StatusCode;
use common::{app, inertia, inertia_get, project, send};
use inertia_axum::fingerprint;

fn current_version(root: &std::path::Path) -> String {
    fingerprint(&root.join("resources/js")).unwrap()
}

#[tokio::test]
async fn test_stale_version_gets_conflict() {
    let dir = project();
    let app = app(inertia(dir.path()));

    let response = send(app, inertia_get("/users?page=2", "stale")).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.header("x-inertia-location"), Some("/users?page=2"));
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.body, "{}");
}

#[tokio::test]
async fn test_matching_version_reaches_handler() {
    let dir = project();
    let version = current_version(dir.path());
    let app = app(inertia(dir.path()));

    let response = send(app, inertia_get("/users", &version)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["component"], "Users/Index");
}

#[tokio::test]
async fn test_missing_client_version_is_a_mismatch() {
    let dir = project();
    let app = app(inertia(dir.path()));

    let req = axum::http::Request::builder()
        .uri("/users")
        .header("x-inertia", "true")
        .header("x-requested-with", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let response = send(app, req).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.header("x-inertia-location"), Some("/users"));
}

#[tokio::test]
async fn test_non_xhr_get_skips_version_check() {
    let dir = project();
    let app = app(inertia(dir.path()));

    let req = axum::http::Request::builder()
        .uri("/users")
        .header("x-inertia-version", "stale")
        .body(Body::empty())
        .unwrap();
    let response = send(app, req).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("content-type").unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_non_get_skips_version_check() {
    let dir = project();
    let app = app(inertia(dir.path()));

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/login")
        .header("x-inertia", "true")
        .header("x-requested-with", "XMLHttpRequest")
        .header("x-inertia-version", "stale")
        .body(Body::empty())
        .unwrap();
    let response = send(app, req).await;

    assert_eq!(response.status, StatusCode::FOUND);
}

#[tokio::test]
async fn test_redirects_after_unsafe_verbs_become_see_other() {
    let dir = project();
    let inertia = inertia(dir.path());

    for method in ["PUT", "PATCH", "DELETE"] {
        let req = axum::http::Request::builder()
            .method(method)
            .uri("/users/1")
            .body(Body::empty())
            .unwrap();
        let response = send(app(inertia.clone()), req).await;

        assert_eq!(response.status, StatusCode::SEE_OTHER, "{method}");
        assert_eq!(response.header("location"), Some("/users"));
    }
}

#[tokio::test]
async fn test_post_redirect_keeps_found() {
    let dir = project();
    let app = app(inertia(dir.path()));

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/login")
        .body(Body::empty())
        .unwrap();
    let response = send(app, req).await;

    assert_eq!(response.status, StatusCode::FOUND);
}

#[tokio::test]
async fn test_passed_responses_carry_version_and_vary() {
    let dir = project();
    let version = current_version(dir.path());
    let app = app(inertia(dir.path()));

    let response = send(app, inertia_get("/users", &version)).await;

    assert_eq!(response.header("x-inertia-version"), Some(version.as_str()));
    let vary: Vec<&str> = response
        .headers
        .get_all("vary")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert!(vary.contains(&"Accept"));
    assert!(vary.contains(&"X-Inertia"));
}

#[tokio::test]
async fn test_html_response_has_single_vary_entry() {
    let dir = project();
    let app = app(inertia(dir.path()));

    let response = send(app, common::browser_get("/users")).await;

    assert_eq!(response.headers.get_all("vary").iter().count(), 1);
    assert_eq!(response.header("vary"), Some("X-Inertia"));
}

#[tokio::test]
async fn test_asset_change_invalidates_old_version() {
    let dir = project();
    let before = current_version(dir.path());
    let inertia = inertia(dir.path());

    let response = send(app(inertia.clone()), inertia_get("/users", &before)).await;
    assert_eq!(response.status, StatusCode::OK);

    fs::write(dir.path().join("resources/js/extra.js"), "export {}").unwrap();

    let response = send(app(inertia.clone()), inertia_get("/users", &before)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let after = current_version(dir.path());
    assert_ne!(before, after);
    let response = send(app(inertia), inertia_get("/users", &after)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_asset_directory_fails_request() {
    let dir = project();
    let inertia = inertia(dir.path());
    fs::remove_dir_all(dir.path().join("resources/js")).unwrap();

    let response = send(app(inertia), common::browser_get("/users")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"]["type"], "fingerprint_error");
}
