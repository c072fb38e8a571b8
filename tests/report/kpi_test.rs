//! Integration tests for the KPI functions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use salesboard::model::{SalesLine, SalesLineRecord};
use salesboard::report::{
    average_order_value, distinct_product_count, order_count, total_revenue, Kpis,
};
use std::str::FromStr;

fn record(order_id: i64, day: (i32, u32, u32), product: &str, region: &str, line_total: &str) -> SalesLineRecord {
    let line_total = Decimal::from_str(line_total).unwrap();
    SalesLine {
        order_id,
        order_date: NaiveDate::from_ymd_opt(day.0, day.1, day.2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        total_due: line_total,
        region: region.to_string(),
        product_name: product.to_string(),
        product_number: String::new(),
        category: "Bikes".to_string(),
        quantity: 1,
        unit_price: line_total,
        line_total,
    }
    .into()
}

fn two_orders() -> Vec<SalesLineRecord> {
    vec![
        record(1, (2024, 1, 15), "Mountain-100", "California", "500.00"),
        record(2, (2024, 2, 10), "Road-150", "Texas", "300.00"),
    ]
}

#[test]
fn test_two_order_scenario() {
    let records = two_orders();

    assert_eq!(total_revenue(&records), Decimal::from(800));
    assert_eq!(order_count(&records), 2);
    assert_eq!(average_order_value(&records), Decimal::from(400));
    assert_eq!(distinct_product_count(&records), 2);
}

#[test]
fn test_average_is_zero_without_orders() {
    let records: Vec<SalesLineRecord> = Vec::new();

    assert_eq!(total_revenue(&records), Decimal::ZERO);
    assert_eq!(order_count(&records), 0);
    assert_eq!(average_order_value(&records), Decimal::ZERO);
    assert_eq!(distinct_product_count(&records), 0);
}

#[test]
fn test_order_count_is_distinct_orders_not_lines() {
    let mut records = two_orders();
    records.push(record(1, (2024, 1, 15), "Water Bottle", "California", "4.99"));

    assert_eq!(order_count(&records), 2);
    assert_eq!(total_revenue(&records), Decimal::from_str("804.99").unwrap());
    assert_eq!(
        average_order_value(&records),
        Decimal::from_str("402.495").unwrap()
    );
}

#[test]
fn test_same_product_sold_twice_counts_once() {
    let records = vec![
        record(1, (2024, 1, 1), "Road-150", "Texas", "10"),
        record(2, (2024, 1, 2), "Road-150", "Ohio", "10"),
    ];
    assert_eq!(distinct_product_count(&records), 1);
}

#[test]
fn test_kpis_serialize_as_flat_object() {
    let kpis = Kpis::compute(&two_orders());
    let json = serde_json::to_value(&kpis).unwrap();

    assert_eq!(json["order_count"], 2);
    assert_eq!(json["distinct_products"], 2);
    assert!(json.get("total_revenue").is_some());
    assert!(json.get("average_order_value").is_some());
}
