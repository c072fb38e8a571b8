//! Typed sales records and calendar buckets.

pub mod record;
pub mod time;

pub use record::{Dataset, SalesLine, SalesLineRecord};
pub use time::{Granularity, TimeBucket};
