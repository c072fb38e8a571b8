// src/model/time.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// Calendar period used to group revenue for trend charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            "quarter" | "quarterly" | "q" => Ok(Granularity::Quarter),
            "year" | "yearly" | "y" => Ok(Granularity::Year),
            other => Err(format!(
                "unknown granularity '{}'. Expected: month, quarter, year",
                other
            )),
        }
    }
}

/// A calendar bucket such as `2024-02`, `2024Q1` or `2024`.
///
/// Ordering is chronological on `(year, period)`, never on the label text,
/// so `2025-02` sorts before `2025-10` whatever the label formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeBucket {
    pub year: i32,
    /// Month (1-12), quarter (1-4) or 0 for yearly buckets.
    pub period: u32,
    pub granularity: Granularity,
}

impl TimeBucket {
    pub fn new(year: i32, month: u32, granularity: Granularity) -> Self {
        let period = match granularity {
            Granularity::Month => month,
            Granularity::Quarter => month.div_ceil(3),
            Granularity::Year => 0,
        };
        Self {
            year,
            period,
            granularity,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Month => write!(f, "{:04}-{:02}", self.year, self.period),
            Granularity::Quarter => write!(f, "{}Q{}", self.year, self.period),
            Granularity::Year => write!(f, "{}", self.year),
        }
    }
}

impl Serialize for TimeBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
