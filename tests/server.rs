//! HTTP front integration tests against a live server.

mod common;

use std::io::Write;

use clear_router::config::{AppConfig, FallbackConfig};
use clear_router::http::RouteSummary;
use clear_router::HistoryMode;
use reqwest::StatusCode;
use tempfile::NamedTempFile;

const SHELL: &str = "<!doctype html><div id=\"app\"></div>";

fn shell_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SHELL.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_health() {
    let server = common::start_server(AppConfig::default()).await;
    let resp = common::client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_route_listing_keeps_table_order() {
    let server = common::start_server(AppConfig::default()).await;
    let routes: Vec<RouteSummary> = common::client()
        .get(server.url("/api/routes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        ["/", "/map", "/sdkg", "/node/:id", "/home", "/settings"]
    );
    assert_eq!(routes[0].redirect.as_deref(), Some("/home"));
    assert_eq!(routes[3].view.as_deref(), Some("NodeDoc"));
}

#[tokio::test]
async fn test_resolve_api() {
    let server = common::start_server(AppConfig::default()).await;
    let client = common::client();

    let resp = client
        .get(server.url("/api/resolve"))
        .query(&[("path", "/node/42")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["view"], "NodeDoc");
    assert_eq!(body["params"]["id"], "42");

    let resp = client
        .get(server.url("/api/resolve"))
        .query(&[("path", "/")])
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["view"], "Home");
    assert_eq!(body["redirected_from"], "/");

    let resp = client
        .get(server.url("/api/resolve"))
        .query(&[("path", "/does-not-exist")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "no route matches `/does-not-exist`");
}

#[tokio::test]
async fn test_deep_link_serves_shell() {
    let shell = shell_file();
    let mut config = AppConfig::default();
    config.server.index_file = Some(shell.path().to_path_buf());
    let server = common::start_server(config).await;

    let resp = common::client().get(server.url("/map")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), SHELL);

    let resp = common::client()
        .get(server.url("/node/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deep_link_without_shell_returns_resolution() {
    let server = common::start_server(AppConfig::default()).await;
    let resp = common::client()
        .get(server.url("/settings"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Settings");
    assert_eq!(body["fallback"], false);
}

#[tokio::test]
async fn test_root_redirects_to_home() {
    let server = common::start_server(AppConfig::default()).await;
    let resp = common::client()
        .get(server.url("/?tab=recent"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()["location"], "/home?tab=recent");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let server = common::start_server(AppConfig::default()).await;
    let resp = common::client()
        .get(server.url("/does-not-exist"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.text().await.unwrap(), "route not found");
}

#[tokio::test]
async fn test_unknown_path_with_fallback_view() {
    let mut config = AppConfig::default();
    config.router.fallback = Some(FallbackConfig {
        name: "NotFound".into(),
        view: "NotFound".into(),
    });
    let server = common::start_server(config).await;

    let resp = common::client()
        .get(server.url("/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["view"], "NotFound");
    assert_eq!(body["fallback"], true);
}

#[tokio::test]
async fn test_base_path_prefixes_redirects() {
    let mut config = AppConfig::default();
    config.router.base = "/app".into();
    let server = common::start_server(config).await;
    let client = common::client();

    let resp = client.get(server.url("/app/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()["location"], "/app/home");

    let resp = client.get(server.url("/app/map")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.get(server.url("/map")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hash_mode_serves_document_only() {
    let shell = shell_file();
    let mut config = AppConfig::default();
    config.router.history = HistoryMode::Hash;
    config.server.index_file = Some(shell.path().to_path_buf());
    let server = common::start_server(config).await;
    let client = common::client();

    let resp = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), SHELL);

    let resp = client.get(server.url("/map")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_get_is_rejected() {
    let server = common::start_server(AppConfig::default()).await;
    let resp = common::client().post(server.url("/map")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = common::start_server(AppConfig::default()).await;
    let resp = common::client()
        .get(server.url("/map"))
        .header("x-request-id", "test-correlation-1")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["x-request-id"], "test-correlation-1");
}
