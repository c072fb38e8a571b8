//! Wire format spoken with the database worker.
//!
//! One JSON object per line in each direction. Every request carries an id
//! that the worker echoes on its response; responses may arrive in any
//! order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Worker method names.
pub mod methods {
    pub const EXECUTE_QUERY: &str = "query.execute";
}

/// Error codes the worker reports in failed responses.
pub mod codes {
    pub const DRIVER_NOT_FOUND: &str = "DRIVER_NOT_FOUND";
    pub const CONNECTION_FAILED: &str = "CONNECTION_FAILED";
    pub const QUERY_FAILED: &str = "QUERY_FAILED";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    /// Never sent by the worker; synthesized when its stdout closes.
    pub const WORKER_EXITED: &str = "WORKER_EXITED";
}

#[derive(Debug, Clone, Serialize)]
pub struct Request<P> {
    pub id: String,
    pub method: &'static str,
    pub params: P,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

impl Response {
    /// Stand-in response for a request whose worker went away.
    pub(crate) fn exited(id: String) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(RemoteError {
                code: codes::WORKER_EXITED.to_string(),
                message: "worker closed its output".to_string(),
            }),
        }
    }

    /// Split into the result payload or the reported error.
    pub fn into_outcome(self) -> Result<Value, RemoteError> {
        if self.success {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            Err(self.error.unwrap_or_else(|| RemoteError {
                code: "UNKNOWN".to_string(),
                message: "failed response without error details".to_string(),
            }))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteError {
    pub code: String,
    pub message: String,
}

/// Which database a query runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTarget {
    /// Worker driver name: `mssql` or `duckdb`.
    pub driver: String,
    pub connection_string: String,
}

/// Parameters of `query.execute`. The target is flattened into the object.
#[derive(Debug, Clone, Serialize)]
pub struct QueryParams<'a> {
    #[serde(flatten)]
    pub target: &'a QueryTarget,
    pub sql: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
}

/// Result of `query.execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Value>>,
    #[serde(default)]
    pub row_count: Option<i64>,
}

impl QueryResult {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
