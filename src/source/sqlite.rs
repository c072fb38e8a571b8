//! `DatabaseClient` backed by a local SQLite file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use tracing::debug;

use super::{DataError, DataResult, DatabaseClient, RowSet};
use crate::config::Driver;

/// Opens the database file for each query and closes it before returning.
///
/// The connection is read-only; a missing file is a connection error rather
/// than a freshly created empty database.
#[derive(Debug, Clone)]
pub struct SqliteDatabaseClient {
    path: PathBuf,
}

impl SqliteDatabaseClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatabaseClient for SqliteDatabaseClient {
    fn driver(&self) -> Driver {
        Driver::Sqlite
    }

    async fn execute_query(&self, sql: &str) -> DataResult<RowSet> {
        let path = self.path.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || run_query(&path, &sql))
            .await
            .map_err(DataError::query)?
    }
}

fn run_query(path: &Path, sql: &str) -> DataResult<RowSet> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(DataError::connection)?;
    debug!(path = %path.display(), "sqlite connection opened");

    let mut stmt = conn.prepare(sql).map_err(DataError::query)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([]).map_err(DataError::query)?;
    while let Some(row) = cursor.next().map_err(DataError::query)? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(cell_to_json(row.get_ref(i).map_err(DataError::query)?));
        }
        rows.push(cells);
    }

    Ok(RowSet { columns, rows })
}

fn cell_to_json(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        // No column of the sales query is binary
        ValueRef::Blob(_) => Value::Null,
    }
}
