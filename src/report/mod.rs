//! Aggregation and reporting.
//!
//! Pure functions over any iterator of borrowed records: a [`Dataset`],
//! a slice, or a [`FilteredView`]. None of them fail; an empty input gives
//! zeroed KPIs and empty sequences.
//!
//! [`Dataset`]: crate::model::Dataset
//! [`FilteredView`]: crate::filter::FilteredView

pub mod format;
pub mod kpi;
pub mod series;

pub use format::{format_count, format_currency, format_value};
pub use kpi::{average_order_value, distinct_product_count, order_count, total_revenue, Kpis};
pub use series::{
    category_share, product_ranking, revenue_by_product, revenue_by_region,
    revenue_by_time_bucket, BucketRevenue, CategoryShare, ProductRevenue, RegionRevenue,
};
