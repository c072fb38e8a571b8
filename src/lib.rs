//! # Salesboard
//!
//! Sales analytics over the AdventureWorks order tables: one join query,
//! typed in-memory filters, KPIs and grouped revenue series.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │      Settings (salesboard.toml, env, deployment)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [source::connect]
//! ┌─────────────────────────────────────────────────────────┐
//! │   DatabaseClient (worker: mssql/duckdb, direct: sqlite)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader::load]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Dataset (Vec<SalesLineRecord>, read-only)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 FilteredView (borrowed)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report]
//! ┌─────────────────────────────────────────────────────────┐
//! │       KPIs + time / product / category / region series   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`dashboard::AppContext`] owns the loaded dataset; each
//! [`dashboard::Session`] carries one user's selections.

pub mod config;
pub mod dashboard;
pub mod filter;
pub mod loader;
pub mod model;
pub mod render;
pub mod report;
pub mod source;
pub mod worker;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{Deployment, Driver, Settings};
    pub use crate::dashboard::{AppContext, DashboardSnapshot, Session};
    pub use crate::filter::{filter, DateRange, FilterOptions, FilterPredicate, FilteredView};
    pub use crate::model::{Dataset, Granularity, SalesLine, SalesLineRecord, TimeBucket};
    pub use crate::report::{
        average_order_value, category_share, distinct_product_count, format_count,
        format_currency, format_value, order_count, revenue_by_product, revenue_by_region,
        revenue_by_time_bucket, total_revenue, Kpis,
    };
    pub use crate::source::{connect, DataError, DataResult, DatabaseClient, RowSet};
}
