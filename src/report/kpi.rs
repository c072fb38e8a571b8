// src/report/kpi.rs
use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::SalesLineRecord;

/// Sum of line totals.
pub fn total_revenue<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    records.into_iter().map(|r| r.line_total).sum()
}

/// Number of distinct order identifiers.
pub fn order_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    records
        .into_iter()
        .map(|r| r.order_id)
        .collect::<HashSet<_>>()
        .len()
}

/// `total_revenue / order_count`, or zero when there are no orders.
pub fn average_order_value<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a SalesLineRecord> + Clone,
{
    average(total_revenue(records.clone()), order_count(records))
}

/// Number of distinct product names.
pub fn distinct_product_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    records
        .into_iter()
        .map(|r| r.product_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}

/// The four headline figures of a filtered view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_revenue: Decimal,
    pub order_count: usize,
    pub average_order_value: Decimal,
    pub distinct_products: usize,
}

impl Kpis {
    /// Compute all four figures in one pass.
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SalesLineRecord>,
    {
        let mut total = Decimal::ZERO;
        let mut orders = HashSet::new();
        let mut products = HashSet::new();

        for record in records {
            total += record.line_total;
            orders.insert(record.order_id);
            products.insert(record.product_name.as_str());
        }

        Self {
            total_revenue: total,
            order_count: orders.len(),
            average_order_value: average(total, orders.len()),
            distinct_products: products.len(),
        }
    }
}
