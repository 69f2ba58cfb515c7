//! Push streams: the server side of a long-lived `text/event-stream` response.

pub mod frame;
pub mod heartbeat;

use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;

use heartbeat::Heartbeat;

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

/// Write handle for one open push stream.
///
/// Writes are queued on an unbounded channel whose receiver feeds the HTTP
/// response body, so they never block. Dropping the handle ends the stream
/// once queued frames are flushed, and always cancels its heartbeat first.
#[derive(Debug)]
pub struct PushStream {
    id: u64,
    tx: mpsc::UnboundedSender<Bytes>,
    heartbeat: Option<Heartbeat>,
}

impl PushStream {
    pub fn open() -> (Self, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stream = Self {
            id: NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed),
            tx,
            heartbeat: None,
        };
        (stream, rx)
    }

    /// Process-unique id, used to tell a live stream from one it displaced.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once the client side has gone away.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    pub fn send_event(&self, name: &str, data: &[u8]) -> bool {
        self.tx.send(frame::encode_event(name, data)).is_ok()
    }

    /// Start, or restart, the keep-alive timer. Any previous timer is cancelled
    /// first, so at most one is ever active for this stream.
    pub fn start_heartbeat(&mut self, period: Duration) {
        self.cancel_heartbeat();
        self.heartbeat = Some(Heartbeat::start(&self.tx, period));
    }

    pub fn cancel_heartbeat(&mut self) {
        if let Some(hb) = self.heartbeat.take() {
            hb.cancel();
        }
    }

    pub fn has_heartbeat(&self) -> bool {
        self.heartbeat.is_some()
    }

    /// Cancel the heartbeat, then close the stream.
    pub fn end(mut self) {
        self.cancel_heartbeat();
    }
}

impl Drop for PushStream {
    fn drop(&mut self) {
        self.cancel_heartbeat();
    }
}

/// Build the `200 text/event-stream` response fed by `rx`.
///
/// `guard` is held by the body until the stream finishes, whether because every
/// sender was dropped or because the transport dropped the body after the
/// client disconnected. Its `Drop` is the close notification.
pub fn event_stream_response<G>(rx: mpsc::UnboundedReceiver<Bytes>, guard: G) -> Response
where
    G: Send + 'static,
{
    let frames = futures_util::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let chunk = rx.recv().await?;
        Some((Ok::<_, Infallible>(chunk), (rx, guard)))
    });

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(EVENT_STREAM_CONTENT_TYPE),
        )],
        Body::from_stream(frames),
    )
        .into_response()
}
