// src/model/record.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// Source fields of one order line, as returned by the join query.
///
/// Converted into a [`SalesLineRecord`] with `into()`, which derives the
/// time-bucket fields once so every aggregation can reuse them.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesLine {
    pub order_id: i64,
    pub order_date: NaiveDateTime,
    pub total_due: Decimal,
    pub region: String,
    pub product_name: String,
    pub product_number: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// One row of the denormalized sales fact table.
///
/// `(order_id, product_name)` is unique within a loaded dataset, and every
/// record carries exactly one category and one region: lines that fail any
/// join in the source query never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesLineRecord {
    pub order_id: i64,
    pub order_date: NaiveDateTime,
    /// Order-level amount, repeated on every line of the same order.
    pub total_due: Decimal,
    pub region: String,
    pub product_name: String,
    pub product_number: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// `quantity * unit_price`, precomputed by the source.
    pub line_total: Decimal,
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`
    pub year_month: String,
}

impl SalesLineRecord {
    /// Calendar day of the order, used for inclusive date-range filtering.
    pub fn order_day(&self) -> NaiveDate {
        self.order_date.date()
    }
}

impl From<SalesLine> for SalesLineRecord {
    fn from(line: SalesLine) -> Self {
        let year = line.order_date.year();
        let month = line.order_date.month();
        Self {
            order_id: line.order_id,
            order_date: line.order_date,
            total_due: line.total_due,
            region: line.region,
            product_name: line.product_name,
            product_number: line.product_number,
            category: line.category,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
            year,
            month,
            year_month: format!("{:04}-{:02}", year, month),
        }
    }
}

/// The immutable record set loaded once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<SalesLineRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalesLineRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesLineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesLineRecord> {
        self.records.iter()
    }
}

impl FromIterator<SalesLineRecord> for Dataset {
    fn from_iter<T: IntoIterator<Item = SalesLineRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a SalesLineRecord;
    type IntoIter = std::slice::Iter<'a, SalesLineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
