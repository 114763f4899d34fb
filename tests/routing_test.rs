//! Page routing over HTTP.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use qc_console::config::ConsoleConfig;
use qc_console::http::HttpServer;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_index_renders_dashboard_in_layout() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let res = common::client().get(server.url("/")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();
    assert!(body.contains("<title>Dashboard - COPD QC System</title>"));
    assert!(body.contains(r#"<main id="outlet">"#));
    assert!(body.contains("<h1>Dashboard</h1>"));
    assert!(body.contains(r#"<a href="/" class="text-primary" aria-current="page">"#));
    assert!(body.contains(r#"<a href="/data-exploration">"#));
}

#[tokio::test]
async fn test_data_exploration_renders_in_layout() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let res = common::client()
        .get(server.url("/data-exploration"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("<h1>Data Exploration</h1>"));
    assert!(body.contains(r#"<a href="/data-exploration" class="text-primary" aria-current="page">"#));
    assert!(body.contains("<footer>"));
}

#[tokio::test]
async fn test_unknown_paths_redirect_to_index() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let client = common::client();

    for path in ["/nope", "/data-exploration/extra", "/DATA-EXPLORATION", "/index.html"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(res.headers()[header::LOCATION], "/", "{path}");
    }
}

#[tokio::test]
async fn test_redirect_followed_lands_on_dashboard() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let res = reqwest::get(server.url("/bogus")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.url().path(), "/");
    assert!(res.text().await.unwrap().contains("<h1>Dashboard</h1>"));
}

#[tokio::test]
async fn test_page_routes_reject_writes() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let res = common::client().post(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_resolve_endpoint_reports_redirect() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let client = common::client();

    let json: serde_json::Value = client
        .get(server.url("/api/routes/resolve?path=/bogus"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["requested"], "/bogus");
    assert_eq!(json["path"], "/");
    assert_eq!(json["page"], "dashboard");
    assert_eq!(json["redirected"], true);
    assert_eq!(json["replace"], true);

    let json: serde_json::Value = client
        .get(server.url("/api/routes/resolve?path=/data-exploration"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["page"], "data_exploration");
    assert_eq!(json["redirected"], false);
}

#[tokio::test]
async fn test_route_table_endpoint() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let json: serde_json::Value = common::client()
        .get(server.url("/api/routes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["pattern"], "/");
    assert_eq!(entries[0]["is_index"], true);
    assert_eq!(entries[2]["pattern"], "*");
    assert_eq!(entries[2]["action"]["kind"], "redirect");
}

#[tokio::test]
async fn test_unknown_api_path_is_not_redirected() {
    let server = common::start_server(ConsoleConfig::default()).await;
    let res = common::client().get(server.url("/api/nope")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["detail"], "Not Found");
}

#[tokio::test]
async fn test_theme_stylesheet_in_process() {
    let server = HttpServer::new(ConsoleConfig::default());
    let res = server
        .router()
        .oneshot(Request::get("/theme.css").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
    let body = res.into_body().collect().await.unwrap().to_bytes();
    let css = String::from_utf8(body.to_vec()).unwrap();
    assert!(css.contains("--color-primary: #3b82f6;"));
    assert!(css.contains(".text-error { color: var(--color-error); }"));
}

#[tokio::test]
async fn test_redirect_in_process() {
    let server = HttpServer::new(ConsoleConfig::default());
    let res = server
        .router()
        .oneshot(Request::get("/missing/deeply").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "/");
}
