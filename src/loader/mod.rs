//! Data loader: run the sales join once and materialize typed records.

mod decode;
pub mod query;

pub use decode::{decode_rows, parse_datetime, parse_decimal};
pub use query::sales_query;

use std::time::Instant;

use tracing::{info, warn};

use crate::model::Dataset;
use crate::source::{DataError, DataResult, DatabaseClient};

/// Load the full sales record set.
///
/// Fails with [`DataError::EmptyResult`] when the query returns no rows, so
/// callers never build a dashboard over nothing.
pub async fn load(client: &dyn DatabaseClient) -> DataResult<Dataset> {
    let started = Instant::now();
    let driver = client.driver();
    let sql = sales_query(driver);

    info!(%driver, "loading sales lines");
    let rows = client.execute_query(&sql).await.inspect_err(|e| {
        warn!(kind = e.kind(), error = %e, "sales query failed");
    })?;

    if rows.is_empty() {
        warn!(%driver, "sales query returned no rows");
        return Err(DataError::EmptyResult);
    }

    let records = decode_rows(&rows).inspect_err(|e| {
        warn!(error = %e, "sales rows could not be decoded");
    })?;

    info!(
        rows = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sales lines loaded"
    );
    Ok(Dataset::new(records))
}
