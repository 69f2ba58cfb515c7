//! Event-stream wire format.
//!
//! Every event is written as `event:<name>\n`, one `data:<line>\n` per line of
//! payload, then a blank line. Clients parse these bytes exactly, so no space
//! follows the colon.

use axum::body::Bytes;

/// Keep-alive comment. Clients ignore it; idle proxies see traffic.
pub const HEARTBEAT: &[u8] = b":\n";

/// Event names written onto push streams.
pub mod event {
    pub const BUSY: &str = "busy";
    pub const JOIN: &str = "join";
    pub const ROOM_COUNT: &str = "roomCount";
    pub const LEAVE: &str = "leave";
    pub const DECLINED: &str = "declined";
}

/// Name of the event carrying a payload relayed from `sender_id`.
pub fn user_event(sender_id: &str) -> String {
    format!("user-{sender_id}")
}

/// Frame `data` as a single event. Each `\n`-separated line of the payload gets
/// its own `data:` prefix, including a trailing empty line when `data` ends in `\n`.
pub fn encode_event(name: &str, data: &[u8]) -> Bytes {
    let lines = data.split(|b| *b == b'\n');
    let mut buf = Vec::with_capacity(name.len() + data.len() + 16);
    buf.extend_from_slice(b"event:");
    buf.extend_from_slice(name.as_bytes());
    buf.push(b'\n');
    for line in lines {
        buf.extend_from_slice(b"data:");
        buf.extend_from_slice(line);
        buf.push(b'\n');
    }
    buf.push(b'\n');
    Bytes::from(buf)
}

pub fn heartbeat() -> Bytes {
    Bytes::from_static(HEARTBEAT)
}
