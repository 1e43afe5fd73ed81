use error_location::ErrorLocation;

use serde::Serialize;
use uuid::Uuid;

/// Unique connection identifier, assigned at accept time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[track_caller]
    pub fn parse(value: &str) -> Result<Self, crate::WsError> {
        let uuid = Uuid::parse_str(value).map_err(|_| crate::WsError::InvalidMessage {
            message: format!("Invalid connection_id: {}", value),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?;
        Ok(Self(uuid))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
