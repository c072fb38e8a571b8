//! Grouped revenue sequences behind the trend, product, category and region
//! charts.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Granularity, SalesLineRecord, TimeBucket};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketRevenue {
    pub bucket: TimeBucket,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub category: String,
    pub product: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub revenue: Decimal,
    /// Fraction of the summed revenue, in `[0, 1]`.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: Decimal,
}

/// Revenue per time bucket, in chronological order.
///
/// Only buckets with at least one record appear; gaps are not zero-filled.
pub fn revenue_by_time_bucket<'a, I>(records: I, granularity: Granularity) -> Vec<BucketRevenue>
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    let mut buckets: BTreeMap<TimeBucket, Decimal> = BTreeMap::new();
    for record in records {
        let bucket = TimeBucket::new(record.year, record.month, granularity);
        *buckets.entry(bucket).or_default() += record.line_total;
    }

    buckets
        .into_iter()
        .map(|(bucket, revenue)| BucketRevenue { bucket, revenue })
        .collect()
}

/// Every `(category, product)` pair ranked by revenue.
///
/// Sorted by revenue descending, then product name and category ascending,
/// which makes the order total and any prefix of it stable.
pub fn product_ranking<'a, I>(records: I) -> Vec<ProductRevenue>
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    let mut groups: HashMap<(&str, &str), Decimal> = HashMap::new();
    for record in records {
        *groups
            .entry((record.category.as_str(), record.product_name.as_str()))
            .or_default() += record.line_total;
    }

    let mut ranking: Vec<ProductRevenue> = groups
        .into_iter()
        .map(|((category, product), revenue)| ProductRevenue {
            category: category.to_string(),
            product: product.to_string(),
            revenue,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product.cmp(&b.product))
            .then_with(|| a.category.cmp(&b.category))
    });
    ranking
}

/// The `top_n` best-selling products.
pub fn revenue_by_product<'a, I>(records: I, top_n: usize) -> Vec<ProductRevenue>
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    let mut ranking = product_ranking(records);
    ranking.truncate(top_n);
    ranking
}

/// Category split of an already ranked product list.
///
/// Pass the truncated top-N list so the split agrees with the product chart.
pub fn category_share(products: &[ProductRevenue]) -> Vec<CategoryShare> {
    let mut groups: HashMap<&str, Decimal> = HashMap::new();
    for product in products {
        *groups.entry(product.category.as_str()).or_default() += product.revenue;
    }
    let total: Decimal = groups.values().copied().sum();

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(category, revenue)| CategoryShare {
            category: category.to_string(),
            revenue,
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                revenue / total
            },
        })
        .collect();
    shares.sort_by(|a, b| by_revenue_then_name(a.revenue, &a.category, b.revenue, &b.category));
    shares
}

/// Revenue per region, largest first.
pub fn revenue_by_region<'a, I>(records: I) -> Vec<RegionRevenue>
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    let mut groups: HashMap<&str, Decimal> = HashMap::new();
    for record in records {
        *groups.entry(record.region.as_str()).or_default() += record.line_total;
    }

    let mut regions: Vec<RegionRevenue> = groups
        .into_iter()
        .map(|(region, revenue)| RegionRevenue {
            region: region.to_string(),
            revenue,
        })
        .collect();
    regions.sort_by(|a, b| by_revenue_then_name(a.revenue, &a.region, b.revenue, &b.region));
    regions
}

fn by_revenue_then_name(a_rev: Decimal, a_name: &str, b_rev: Decimal, b_name: &str) -> Ordering {
    b_rev.cmp(&a_rev).then_with(|| a_name.cmp(b_name))
}
