//! `DatabaseClient` backed by the database worker (SQL Server, DuckDB).

use async_trait::async_trait;

use super::{DataResult, DatabaseClient, RowSet};
use crate::config::{Driver, WorkerSettings};
use crate::worker::protocol::QueryTarget;
use crate::worker::WorkerClient;

/// Runs queries through a [`WorkerClient`] bound to one database.
///
/// The worker owns the driver-level connection; dropping this client kills
/// the worker process, which releases it.
pub struct WorkerDatabaseClient {
    client: WorkerClient,
    driver: Driver,
    target: QueryTarget,
}

impl WorkerDatabaseClient {
    pub fn new(client: WorkerClient, driver: Driver, connection_string: impl Into<String>) -> Self {
        Self {
            client,
            driver,
            target: QueryTarget {
                driver: driver.as_str().to_string(),
                connection_string: connection_string.into(),
            },
        }
    }

    /// Start a worker from settings and bind it to one connection.
    pub async fn spawn(
        settings: &WorkerSettings,
        driver: Driver,
        connection_string: impl Into<String>,
    ) -> DataResult<Self> {
        let client = WorkerClient::spawn(settings).await?;
        Ok(Self::new(client, driver, connection_string))
    }
}

#[async_trait]
impl DatabaseClient for WorkerDatabaseClient {
    fn driver(&self) -> Driver {
        self.driver
    }

    async fn execute_query(&self, sql: &str) -> DataResult<RowSet> {
        let result = self.client.execute_query(&self.target, sql).await?;
        Ok(RowSet {
            columns: result.column_names(),
            rows: result.rows,
        })
    }
}
