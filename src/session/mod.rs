//! Rooms, participants, and the registry that owns them.

pub mod registry;
pub mod room;
pub mod user;

use std::sync::Arc;

pub use registry::{JoinOutcome, SessionRegistry};
pub use room::Session;
pub use user::User;

/// Held by an admitted participant's response body. Dropping it runs close
/// handling for that exact stream.
#[derive(Debug)]
pub struct CloseGuard {
    registry: Arc<SessionRegistry>,
    session_id: String,
    user_id: String,
    stream_id: u64,
}

impl CloseGuard {
    pub fn new(
        registry: Arc<SessionRegistry>,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        stream_id: u64,
    ) -> Self {
        Self {
            registry,
            session_id: session_id.into(),
            user_id: user_id.into(),
            stream_id,
        }
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.registry
            .leave(&self.session_id, &self.user_id, self.stream_id);
    }
}
