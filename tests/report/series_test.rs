//! Integration tests for grouped revenue series.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use salesboard::model::{Granularity, SalesLine, SalesLineRecord};
use salesboard::report::{
    category_share, product_ranking, revenue_by_product, revenue_by_region,
    revenue_by_time_bucket,
};

fn record(day: (i32, u32, u32), category: &str, product: &str, region: &str, total: i64) -> SalesLineRecord {
    SalesLine {
        order_id: i64::from(day.1) * 100 + i64::from(day.2),
        order_date: NaiveDate::from_ymd_opt(day.0, day.1, day.2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
        total_due: Decimal::from(total),
        region: region.to_string(),
        product_name: product.to_string(),
        product_number: String::new(),
        category: category.to_string(),
        quantity: 1,
        unit_price: Decimal::from(total),
        line_total: Decimal::from(total),
    }
    .into()
}

fn catalog() -> Vec<SalesLineRecord> {
    vec![
        record((2023, 11, 3), "Bikes", "Mountain-100", "California", 900),
        record((2024, 1, 15), "Bikes", "Road-150", "Texas", 700),
        record((2024, 2, 10), "Clothing", "Jersey", "Texas", 150),
        record((2024, 2, 11), "Accessories", "Helmet", "Ohio", 120),
        record((2024, 5, 20), "Accessories", "Bottle", "Ohio", 20),
        record((2024, 10, 1), "Components", "Chain", "California", 60),
    ]
}

#[test]
fn test_monthly_revenue_scenario() {
    let records = vec![
        record((2024, 1, 15), "Bikes", "Mountain-100", "California", 500),
        record((2024, 2, 10), "Bikes", "Road-150", "Texas", 300),
    ];
    let series: Vec<(String, Decimal)> = revenue_by_time_bucket(&records, Granularity::Month)
        .into_iter()
        .map(|b| (b.bucket.label(), b.revenue))
        .collect();

    assert_eq!(
        series,
        vec![
            ("2024-01".to_string(), Decimal::from(500)),
            ("2024-02".to_string(), Decimal::from(300)),
        ]
    );
}

#[test]
fn test_yearly_and_quarterly_buckets() {
    let records = catalog();

    let years: Vec<String> = revenue_by_time_bucket(&records, Granularity::Year)
        .iter()
        .map(|b| b.bucket.label())
        .collect();
    assert_eq!(years, vec!["2023", "2024"]);

    let quarters = revenue_by_time_bucket(&records, Granularity::Quarter);
    let labels: Vec<String> = quarters.iter().map(|b| b.bucket.label()).collect();
    assert_eq!(labels, vec!["2023Q4", "2024Q1", "2024Q2", "2024Q4"]);
    assert_eq!(quarters[1].revenue, Decimal::from(970));
}

#[test]
fn test_bucket_totals_sum_to_total_revenue() {
    let records = catalog();
    let total: Decimal = records.iter().map(|r| r.line_total).sum();
    for granularity in [Granularity::Month, Granularity::Quarter, Granularity::Year] {
        let sum: Decimal = revenue_by_time_bucket(&records, granularity)
            .iter()
            .map(|b| b.revenue)
            .sum();
        assert_eq!(sum, total, "{}", granularity);
    }
}

#[test]
fn test_top_n_is_a_prefix_of_larger_rankings() {
    let records = catalog();
    let full = product_ranking(&records);

    for n in 0..=full.len() + 2 {
        let top = revenue_by_product(&records, n);
        assert_eq!(top.len(), n.min(full.len()));
        assert_eq!(top.as_slice(), &full[..top.len()]);
    }
}

#[test]
fn test_category_share_follows_truncated_products() {
    let records = catalog();
    let top = revenue_by_product(&records, 2);
    let shares = category_share(&top);

    // Only the two bike products survive the cut
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].category, "Bikes");
    assert_eq!(shares[0].revenue, Decimal::from(1600));
    assert_eq!(shares[0].share, Decimal::ONE);
}

#[test]
fn test_category_shares_sum_to_one() {
    let top = revenue_by_product(&catalog(), 10);
    let shares = category_share(&top);
    let sum: Decimal = shares.iter().map(|s| s.share).sum();

    assert_eq!(shares.len(), 4);
    assert!((sum - Decimal::ONE).abs() < Decimal::new(1, 20));
}

#[test]
fn test_regions_sorted_by_revenue() {
    let regions: Vec<(String, Decimal)> = revenue_by_region(&catalog())
        .into_iter()
        .map(|r| (r.region, r.revenue))
        .collect();

    assert_eq!(
        regions,
        vec![
            ("California".to_string(), Decimal::from(960)),
            ("Texas".to_string(), Decimal::from(850)),
            ("Ohio".to_string(), Decimal::from(140)),
        ]
    );
}

#[test]
fn test_empty_input_gives_empty_series() {
    let records: Vec<SalesLineRecord> = Vec::new();
    assert!(revenue_by_time_bucket(&records, Granularity::Month).is_empty());
    assert!(revenue_by_product(&records, 10).is_empty());
    assert!(revenue_by_region(&records).is_empty());
}
