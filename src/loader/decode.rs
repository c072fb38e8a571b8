//! Row decoding: JSON cells to typed sales lines.
//!
//! Drivers disagree on how they ship money and timestamps. SQL Server
//! `money` arrives as a string through the worker, SQLite as a float; dates
//! come as RFC 3339 or as plain `YYYY-MM-DD HH:MM:SS`. Everything is
//! normalized here, once, at load time.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

use super::query::columns;
use crate::model::{SalesLine, SalesLineRecord};
use crate::source::{DataError, DataResult, RowSet};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Positions of the sales columns in a result set.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    order_id: usize,
    order_date: usize,
    total_due: usize,
    region: usize,
    product_name: usize,
    product_number: usize,
    category: usize,
    quantity: usize,
    unit_price: usize,
    line_total: usize,
}

impl ColumnMap {
    fn resolve(names: &[String]) -> DataResult<Self> {
        let find = |wanted: &str| {
            names
                .iter()
                .position(|name| name.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| {
                    DataError::Query(format!("result set is missing column {}", wanted))
                })
        };

        Ok(Self {
            order_id: find(columns::ORDER_ID)?,
            order_date: find(columns::ORDER_DATE)?,
            total_due: find(columns::TOTAL_DUE)?,
            region: find(columns::REGION)?,
            product_name: find(columns::PRODUCT_NAME)?,
            product_number: find(columns::PRODUCT_NUMBER)?,
            category: find(columns::CATEGORY)?,
            quantity: find(columns::QUANTITY)?,
            unit_price: find(columns::UNIT_PRICE)?,
            line_total: find(columns::LINE_TOTAL)?,
        })
    }
}

/// Decode every row of the sales query.
pub fn decode_rows(rows: &RowSet) -> DataResult<Vec<SalesLineRecord>> {
    let map = ColumnMap::resolve(&rows.columns)?;
    rows.rows
        .iter()
        .enumerate()
        .map(|(index, row)| decode_row(&map, index, row).map(SalesLineRecord::from))
        .collect()
}

fn decode_row(map: &ColumnMap, index: usize, row: &[Value]) -> DataResult<SalesLine> {
    let cell = Cell { index, row };
    Ok(SalesLine {
        order_id: cell.integer(map.order_id, columns::ORDER_ID)?,
        order_date: cell.datetime(map.order_date, columns::ORDER_DATE)?,
        total_due: cell.decimal(map.total_due, columns::TOTAL_DUE)?,
        region: cell.text(map.region, columns::REGION)?,
        product_name: cell.text(map.product_name, columns::PRODUCT_NAME)?,
        product_number: cell.text(map.product_number, columns::PRODUCT_NUMBER)?,
        category: cell.text(map.category, columns::CATEGORY)?,
        quantity: cell.quantity(map.quantity)?,
        unit_price: cell.decimal(map.unit_price, columns::UNIT_PRICE)?,
        line_total: cell.decimal(map.line_total, columns::LINE_TOTAL)?,
    })
}

/// Typed access into one row, with row/column context on failure.
struct Cell<'a> {
    index: usize,
    row: &'a [Value],
}

impl Cell<'_> {
    fn get(&self, position: usize, column: &str) -> DataResult<&Value> {
        match self.row.get(position) {
            Some(Value::Null) | None => Err(self.invalid(column, "unexpected NULL")),
            Some(value) => Ok(value),
        }
    }

    fn invalid(&self, column: &str, detail: impl std::fmt::Display) -> DataError {
        DataError::Query(format!("row {}: column {}: {}", self.index, column, detail))
    }

    fn integer(&self, position: usize, column: &str) -> DataResult<i64> {
        let value = self.get(position, column)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(column, format!("expected an integer, got {}", value)))
    }

    fn quantity(&self, position: usize) -> DataResult<i32> {
        let value = self.integer(position, columns::QUANTITY)?;
        i32::try_from(value).map_err(|_| self.invalid(columns::QUANTITY, "out of range"))
    }

    fn decimal(&self, position: usize, column: &str) -> DataResult<Decimal> {
        let value = self.get(position, column)?;
        parse_decimal(value)
            .ok_or_else(|| self.invalid(column, format!("expected a decimal, got {}", value)))
    }

    fn text(&self, position: usize, column: &str) -> DataResult<String> {
        match self.get(position, column)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.invalid(column, format!("expected text, got {}", other))),
        }
    }

    fn datetime(&self, position: usize, column: &str) -> DataResult<NaiveDateTime> {
        let value = self.get(position, column)?;
        value
            .as_str()
            .and_then(parse_datetime)
            .ok_or_else(|| self.invalid(column, format!("expected a timestamp, got {}", value)))
    }
}

/// Parse a JSON number or numeric string as an exact decimal.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        // Go through the shortest round-trip text, not the binary float
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Normalize the timestamp shapes drivers produce.
///
/// Offsets are dropped, keeping the wall-clock time the database stored.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
