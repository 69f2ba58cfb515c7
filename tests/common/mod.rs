#![allow(dead_code)]

use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::response::Response;
use futures_util::StreamExt;
use http::{Method, Request};
use signalrelay::config::Config;
use signalrelay::routes;
use signalrelay::state::AppState;
use tower::ServiceExt;

/// How long a test waits for an expected frame before failing.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Test server owning its own registry. Each instance is isolated, so tests
/// can run in parallel.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    pub fn new() -> Self {
        Self::with_capacity(2)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_config(Config {
            room_capacity: capacity,
            ..test_config()
        })
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            state: AppState::new(&config),
        }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    pub async fn get(&self, path: &str) -> Response {
        self.send(Method::GET, path, Body::empty()).await
    }

    pub async fn post(&self, path: &str, body: impl Into<Body>) -> Response {
        self.send(Method::POST, path, body.into()).await
    }

    pub async fn send(&self, method: Method, path: &str, body: Body) -> Response {
        self.router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(path)
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Open `user_id`'s push stream into `session_id`.
    pub async fn join(&self, session_id: &str, user_id: &str) -> EventStream {
        let response = self
            .get(&format!("/server-to-client/{session_id}/{user_id}"))
            .await;
        assert_eq!(response.status(), http::StatusCode::OK);
        EventStream::new(response)
    }

    pub fn users_count(&self, session_id: &str) -> Option<usize> {
        self.state.registry.users_count(session_id)
    }
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        bind: "127.0.0.1".to_string(),
        room_capacity: 2,
        heartbeat_interval_secs: 30,
        max_relay_body_bytes: 1024,
        evict_empty_sessions: true,
    }
}

/// Client end of a push stream.
pub struct EventStream {
    body: BodyDataStream,
    buf: String,
}

impl EventStream {
    pub fn new(response: Response) -> Self {
        Self {
            body: response.into_body().into_data_stream(),
            buf: String::new(),
        }
    }

    /// Read until `needle` arrives. Returns everything up to and including it;
    /// the rest stays buffered for the next read.
    pub async fn read_until(&mut self, needle: &str) -> String {
        loop {
            if let Some(pos) = self.buf.find(needle) {
                let end = pos + needle.len();
                return self.buf.drain(..end).collect();
            }
            let chunk = tokio::time::timeout(READ_TIMEOUT, self.body.next())
                .await
                .unwrap_or_else(|_| panic!("timed out waiting for {needle:?}, have {:?}", self.buf))
                .unwrap_or_else(|| panic!("stream ended before {needle:?}, have {:?}", self.buf))
                .expect("body error");
            self.buf.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }

    /// Read until the server ends the stream.
    pub async fn read_to_end(mut self) -> String {
        while let Some(chunk) = tokio::time::timeout(READ_TIMEOUT, self.body.next())
            .await
            .expect("timed out waiting for end of stream")
        {
            self.buf
                .push_str(std::str::from_utf8(&chunk.expect("body error")).unwrap());
        }
        self.buf
    }

    /// Returns true if nothing arrives within `wait`.
    pub async fn is_idle_for(&mut self, wait: Duration) -> bool {
        self.buf.is_empty() && tokio::time::timeout(wait, self.body.next()).await.is_err()
    }
}

pub fn test_config_retaining() -> Config {
    Config {
        evict_empty_sessions: false,
        ..test_config()
    }
}
