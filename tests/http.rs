mod common;

use axum::body::Body;
use http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let server = common::TestServer::new();
    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = common::TestServer::new();
    let response = server.get("/version").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["git_sha"].is_string());
    assert_eq!(json["sessions"], 0);
}

#[tokio::test]
async fn test_no_cache_headers_on_every_response() {
    let server = common::TestServer::new();
    for path in ["/health", "/stoc/room/alice", "/stoc/room", "/nonsense/a/b"] {
        let response = server.get(path).await;
        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache, no-store", "{path}");
        assert_eq!(headers[header::PRAGMA], "no-cache", "{path}");
        assert_eq!(headers[header::EXPIRES], "0", "{path}");
    }
}

#[tokio::test]
async fn test_missing_identifiers_is_400_and_closes() {
    let server = common::TestServer::new();
    for path in [
        "/server-to-client",
        "/server-to-client/room",
        "/server-to-client/room/",
        "/decline//alice",
        "/ctos/room",
    ] {
        let response = server.get(path).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.headers()[header::CONNECTION], "close", "{path}");
    }
    assert_eq!(server.state.registry.session_count(), 0);
}

#[tokio::test]
async fn test_unknown_operation_is_rejected() {
    let server = common::TestServer::new();
    let response = server.get("/nonexistent/room/alice").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CONNECTION], "close");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "unknown_operation");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let server = common::TestServer::new();
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_preflight_does_not_join() {
    let server = common::TestServer::new();
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/server-to-client/room/alice")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
    assert!(!server.state.registry.contains_session("room"));
}
