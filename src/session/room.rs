use std::collections::HashMap;
use std::time::Duration;

use crate::stream::frame::{event, user_event};
use crate::stream::PushStream;

use super::user::User;

pub const DEFAULT_ROOM_CAPACITY: usize = 2;

/// Result of admitting a participant into a session that had room for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub users_count: usize,
    /// The participant already had a record and its old stream was displaced.
    pub reconnected: bool,
}

/// One room: a bounded set of users keyed by participant id.
#[derive(Debug)]
pub struct Session {
    id: String,
    users: HashMap<String, User>,
    capacity: usize,
}

impl Session {
    pub fn new(id: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            users: HashMap::new(),
            capacity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn users_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.users.len() >= self.capacity
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Attach `stream` as `user_id`'s push stream.
    ///
    /// A new participant is announced to every peer holding an open stream
    /// (their heartbeat is re-armed first) and learns each of those peers in
    /// turn. A returning participant has its old stream ended. Either way the
    /// new stream then receives `roomCount`. Capacity is the caller's check.
    pub fn admit(&mut self, user_id: &str, stream: PushStream, heartbeat: Duration) -> Admission {
        let reconnected = match self.users.get_mut(user_id) {
            Some(user) => user.attach(stream),
            None => {
                for (peer_id, peer) in self.users.iter_mut() {
                    if let Some(peer_stream) = peer.live_stream_mut() {
                        peer_stream.start_heartbeat(heartbeat);
                        peer_stream.send_event(event::JOIN, user_id.as_bytes());
                        stream.send_event(event::JOIN, peer_id.as_bytes());
                    }
                }
                let mut user = User::new(user_id);
                user.attach(stream);
                self.users.insert(user_id.to_string(), user);
                false
            }
        };

        let users_count = self.users.len();
        if let Some(stream) = self.users.get(user_id).and_then(User::live_stream) {
            stream.send_event(event::ROOM_COUNT, users_count.to_string().as_bytes());
        }

        Admission {
            users_count,
            reconnected,
        }
    }

    /// Remove `user_id` if `stream_id` is still its current stream, telling
    /// every other connected user it left. Returns false for a stream that was
    /// already displaced or a user that is gone.
    pub fn depart(&mut self, user_id: &str, stream_id: u64) -> bool {
        if self.users.get(user_id).and_then(User::stream_id) != Some(stream_id) {
            return false;
        }

        for (peer_id, peer) in &self.users {
            if peer_id == user_id {
                continue;
            }
            if let Some(stream) = peer.live_stream() {
                stream.send_event(event::LEAVE, user_id.as_bytes());
            }
        }

        if let Some(stream) = self.users.remove(user_id).and_then(|mut u| u.detach()) {
            stream.end();
        }
        true
    }

    /// Tell every connected user that `decliner_id` refused. Returns how many
    /// streams were written.
    pub fn broadcast_declined(&self, decliner_id: &str) -> usize {
        self.users
            .values()
            .filter_map(User::live_stream)
            .filter(|stream| stream.send_event(event::DECLINED, decliner_id.as_bytes()))
            .count()
    }

    /// The open stream of `peer_id`, if it is connected.
    pub fn peer_stream(&self, peer_id: &str) -> Option<&PushStream> {
        self.users.get(peer_id).and_then(User::live_stream)
    }

    /// Deliver `payload` to `peer_id` as a `user-{sender_id}` event.
    pub fn relay(&self, sender_id: &str, peer_id: &str, payload: &[u8]) -> bool {
        self.peer_stream(peer_id)
            .is_some_and(|stream| stream.send_event(&user_event(sender_id), payload))
    }
}
