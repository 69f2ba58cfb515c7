use std::time::Duration;

use crate::session::room::DEFAULT_ROOM_CAPACITY;
use crate::stream::heartbeat::DEFAULT_HEARTBEAT_INTERVAL;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_RELAY_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind: String,
    pub room_capacity: usize,
    pub heartbeat_interval_secs: u64,
    pub max_relay_body_bytes: usize,
    pub evict_empty_sessions: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let room_capacity = std::env::var("RELAY_ROOM_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_ROOM_CAPACITY)
            .max(1);

        let heartbeat_interval_secs = std::env::var("RELAY_HEARTBEAT_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL.as_secs());

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            bind: std::env::var("RELAY_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            room_capacity,
            heartbeat_interval_secs,
            max_relay_body_bytes: std::env::var("RELAY_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_RELAY_BODY_BYTES),
            evict_empty_sessions: std::env::var("RELAY_EVICT_EMPTY_SESSIONS")
                .map(|v| !(v == "0" || v.eq_ignore_ascii_case("false")))
                .unwrap_or(true),
        }
    }

    /// A port given on the command line wins over `PORT`.
    pub fn with_port_override(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
