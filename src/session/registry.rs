use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::Config;
use crate::stream::frame::event;
use crate::stream::PushStream;

use super::room::Session;

/// Outcome of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Admitted {
        stream_id: u64,
        users_count: usize,
        reconnected: bool,
    },
    /// The room was at capacity; the stream got a `busy` event and was ended.
    Busy,
}

/// Process-wide map of room id to [`Session`].
///
/// Each operation runs entirely under the DashMap guard for its room and
/// never awaits, so work on one room is serialized while different rooms
/// proceed in parallel.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    capacity: usize,
    heartbeat_interval: Duration,
    evict_empty: bool,
}

impl SessionRegistry {
    pub fn new(capacity: usize, heartbeat_interval: Duration, evict_empty: bool) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity: capacity.max(1),
            heartbeat_interval,
            evict_empty,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.room_capacity,
            config.heartbeat_interval(),
            config.evict_empty_sessions,
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains_session(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn users_count(&self, session_id: &str) -> Option<usize> {
        self.sessions.get(session_id).map(|s| s.users_count())
    }

    /// Admit `user_id` into `session_id` on `stream`, creating the room if it
    /// does not exist yet. A full room answers `busy` on the stream and ends it.
    pub fn join(&self, session_id: &str, user_id: &str, stream: PushStream) -> JoinOutcome {
        let stream_id = stream.id();
        let mut session = match self.sessions.entry(session_id.to_string()) {
            Entry::Vacant(entry) => {
                tracing::debug!("@{session_id} - created");
                entry.insert(Session::new(session_id, self.capacity))
            }
            Entry::Occupied(entry) => {
                if entry.get().is_full() {
                    tracing::info!("@{session_id} - {user_id} busy ({} max)", self.capacity);
                    stream.send_event(event::BUSY, session_id.as_bytes());
                    stream.end();
                    return JoinOutcome::Busy;
                }
                entry.into_ref()
            }
        };

        let admission = session.admit(user_id, stream, self.heartbeat_interval);
        if admission.reconnected {
            tracing::info!("@{session_id} - {user_id} reconnected, previous stream closed");
        } else {
            tracing::info!("@{session_id} - {user_id} joined");
        }
        tracing::debug!("users in session {session_id}: {}", admission.users_count);

        JoinOutcome::Admitted {
            stream_id,
            users_count: admission.users_count,
            reconnected: admission.reconnected,
        }
    }

    /// Close handling for `stream_id`. A no-op unless it is still the user's
    /// current stream.
    pub fn leave(&self, session_id: &str, user_id: &str, stream_id: u64) -> bool {
        let remaining = match self.sessions.get_mut(session_id) {
            Some(mut session) => session
                .depart(user_id, stream_id)
                .then(|| session.users_count()),
            None => None,
        };
        let Some(remaining) = remaining else {
            return false;
        };

        tracing::info!("@{session_id} - {user_id} left");
        tracing::debug!("users in session {session_id}: {remaining}");

        if self.evict_empty
            && self
                .sessions
                .remove_if(session_id, |_, session| session.is_empty())
                .is_some()
        {
            tracing::debug!("@{session_id} - evicted empty session");
        }
        true
    }

    /// Broadcast `declined` from `user_id`. Returns the number of users told,
    /// or `None` when the room does not exist.
    pub fn decline(&self, session_id: &str, user_id: &str) -> Option<usize> {
        let notified = self
            .sessions
            .get(session_id)
            .map(|session| session.broadcast_declined(user_id))?;
        tracing::info!("@{session_id} - {user_id} declined");
        Some(notified)
    }

    pub fn has_live_peer(&self, session_id: &str, peer_id: &str) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|session| session.peer_stream(peer_id).is_some())
    }

    /// Forward `payload` from `sender_id` to `peer_id`'s stream.
    pub fn relay(&self, session_id: &str, sender_id: &str, peer_id: &str, payload: &[u8]) -> bool {
        let delivered = self
            .sessions
            .get(session_id)
            .is_some_and(|session| session.relay(sender_id, peer_id, payload));
        if delivered {
            tracing::debug!(
                "@{session_id} - {sender_id} => {peer_id} ({} bytes)",
                payload.len()
            );
        }
        delivered
    }
}
