use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Invalid message: {message} {location}")]
    InvalidMessage {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON encode failed: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow {location}")]
    SendBufferFull { location: ErrorLocation },

    #[error("No frame read within {timeout_secs}s {location}")]
    ReadTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Socket write exceeded {timeout_secs}s {location}")]
    WriteTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Hub is not running {location}")]
    HubStopped { location: ErrorLocation },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl WsError {
    /// Stable code used as a metrics label
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::InvalidMessage { .. } => "INVALID_MESSAGE",
            Self::Json { .. } => "ENCODE_ERROR",
            Self::SendBufferFull { .. } => "SLOW_CLIENT",
            Self::ReadTimeout { .. } => "READ_TIMEOUT",
            Self::WriteTimeout { .. } => "WRITE_TIMEOUT",
            Self::HubStopped { .. } => "HUB_STOPPED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    #[track_caller]
    pub fn hub_stopped() -> Self {
        Self::HubStopped {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn connection_closed(reason: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
