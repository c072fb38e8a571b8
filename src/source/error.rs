//! Errors at the database boundary.

use std::fmt::Display;

use thiserror::Error;

use crate::worker::WorkerError;

/// Result type for loading data.
pub type DataResult<T> = Result<T, DataError>;

/// Why the sales data could not be loaded.
///
/// All three are terminal for the session: the caller shows the message and
/// stops. Nothing retries.
#[derive(Debug, Error)]
pub enum DataError {
    /// The database could not be reached.
    #[error("cannot connect to the database: {0}")]
    Connection(String),

    /// The database was reached but the query failed, e.g. a schema mismatch.
    #[error("sales query failed: {0}")]
    Query(String),

    /// The query succeeded but returned no rows.
    #[error("sales query returned no rows")]
    EmptyResult,
}

impl DataError {
    pub fn connection(err: impl Display) -> Self {
        Self::Connection(err.to_string())
    }

    pub fn query(err: impl Display) -> Self {
        Self::Query(err.to_string())
    }

    /// Short category name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DataError::Connection(_) => "connection",
            DataError::Query(_) => "query",
            DataError::EmptyResult => "empty_result",
        }
    }
}

impl From<WorkerError> for DataError {
    fn from(err: WorkerError) -> Self {
        if err.is_connectivity() {
            DataError::connection(err)
        } else {
            DataError::query(err)
        }
    }
}
