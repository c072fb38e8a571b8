//! Worker-specific error types.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use super::protocol::{codes, RemoteError};

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("database worker not found; set worker.path in salesboard.toml")]
    NotFound,

    #[error("failed to start database worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to send request to database worker: {0}")]
    Send(#[source] io::Error),

    #[error("malformed message from database worker: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("database worker did not answer within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("database worker exited")]
    Exited,

    #[error("{kind}: {message}")]
    Remote { kind: RemoteKind, message: String },
}

/// Failure category reported by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteKind {
    DriverNotFound,
    ConnectionFailed,
    QueryFailed,
    InvalidRequest,
    Other(String),
}

impl RemoteKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            codes::DRIVER_NOT_FOUND => Self::DriverNotFound,
            codes::CONNECTION_FAILED => Self::ConnectionFailed,
            codes::QUERY_FAILED => Self::QueryFailed,
            codes::INVALID_REQUEST => Self::InvalidRequest,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriverNotFound => f.write_str("driver not available"),
            Self::ConnectionFailed => f.write_str("connection failed"),
            Self::QueryFailed => f.write_str("query failed"),
            Self::InvalidRequest => f.write_str("invalid request"),
            Self::Other(code) => write!(f, "worker error {}", code),
        }
    }
}

impl From<RemoteError> for WorkerError {
    fn from(err: RemoteError) -> Self {
        if err.code == codes::WORKER_EXITED {
            return Self::Exited;
        }
        Self::Remote {
            kind: RemoteKind::from_code(&err.code),
            message: err.message,
        }
    }
}

impl WorkerError {
    /// Whether the database was never reached.
    ///
    /// Everything else means the database answered but the query failed.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::NotFound | Self::Spawn(_) | Self::Send(_) | Self::Exited => true,
            Self::Remote { kind, .. } => {
                matches!(kind, RemoteKind::DriverNotFound | RemoteKind::ConnectionFailed)
            }
            Self::Protocol(_) | Self::Timeout(_) => false,
        }
    }
}
