//! Request routing: `/{operation}/{sessionId}/{userId}[/{peerId}]`.

use std::fmt;

/// The three things a request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Forward the request body to a peer's stream.
    Relay,
    /// Open this participant's push stream and enter the room.
    Join,
    /// Tell the room this participant refuses.
    Decline,
}

impl Operation {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "client-to-client-via-server" | "ctos" => Some(Operation::Relay),
            "server-to-client" | "stoc" => Some(Operation::Join),
            "decline" => Some(Operation::Decline),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Relay => "client-to-client-via-server",
            Operation::Join => "server-to-client",
            Operation::Decline => "decline",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownOperation(String),
    MissingIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub operation: Operation,
    pub session_id: String,
    pub user_id: String,
    pub peer_id: Option<String>,
}

impl Route {
    /// Parse a request path. Segments are taken verbatim; anything after the
    /// peer segment is ignored.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let mut parts = path.strip_prefix('/').unwrap_or(path).split('/');
        let op = parts.next().unwrap_or_default();
        let operation =
            Operation::parse(op).ok_or_else(|| RouteError::UnknownOperation(op.to_string()))?;

        let session_id = parts.next().filter(|s| !s.is_empty());
        let user_id = parts.next().filter(|s| !s.is_empty());
        let (Some(session_id), Some(user_id)) = (session_id, user_id) else {
            return Err(RouteError::MissingIdentifier);
        };
        let peer_id = parts.next().filter(|s| !s.is_empty()).map(str::to_string);

        Ok(Self {
            operation,
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            peer_id,
        })
    }
}
