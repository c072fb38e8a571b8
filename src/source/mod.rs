//! Database boundary.
//!
//! The core only needs one capability from a database: run a read-only
//! query and hand back its rows. [`DatabaseClient`] is that capability; each
//! deployment target gets one implementation, chosen once at startup by
//! [`connect`].
//!
//! ```text
//! ┌───────────────────────┐     ┌────────────────────────────────┐
//! │ ResolvedConnection    │────▶│ connect()                      │
//! │ (driver + conn str)   │     │  mssql / duckdb ─▶ Worker…     │
//! └───────────────────────┘     │  sqlite         ─▶ Sqlite…     │
//!                               └────────────────────────────────┘
//!                                              │
//!                                              ▼
//!                               Box<dyn DatabaseClient>::execute_query
//! ```

mod error;
mod sqlite;
mod worker;

pub use error::{DataError, DataResult};
pub use sqlite::SqliteDatabaseClient;
pub use worker::WorkerDatabaseClient;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Driver, ResolvedConnection, WorkerSettings};

/// Rows returned by a query: column names plus JSON scalar cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A read-only query capability against the sales database.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Driver behind this client; decides how table names are written.
    fn driver(&self) -> Driver;

    /// Execute one query and materialize all its rows.
    ///
    /// Any connection the implementation acquires is released before this
    /// returns, whether the query succeeded or not.
    async fn execute_query(&self, sql: &str) -> DataResult<RowSet>;
}

/// Build the client for a resolved connection.
pub async fn connect(
    connection: &ResolvedConnection,
    worker: &WorkerSettings,
) -> DataResult<Box<dyn DatabaseClient>> {
    info!(
        connection = %connection.name,
        driver = %connection.driver,
        "selecting database client"
    );

    if !connection.driver.uses_worker() {
        return Ok(Box::new(SqliteDatabaseClient::new(
            &connection.connection_string,
        )));
    }

    let client = WorkerDatabaseClient::spawn(
        worker,
        connection.driver,
        connection.connection_string.clone(),
    )
    .await?;
    Ok(Box::new(client))
}
