//! Integration tests for the dashboard context and sessions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use salesboard::config::{DashboardSettings, Settings};
use salesboard::dashboard::AppContext;
use salesboard::filter::DateRange;
use salesboard::model::{Dataset, Granularity, SalesLine};

fn dataset() -> Dataset {
    [
        (1, (2024, 1, 15), "Mountain-100", "California", 500),
        (2, (2024, 2, 10), "Road-150", "Texas", 300),
    ]
    .into_iter()
    .map(|(id, (y, m, d), product, region, total)| {
        SalesLine {
            order_id: id,
            order_date: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            total_due: Decimal::from(total),
            region: region.to_string(),
            product_name: product.to_string(),
            product_number: format!("BK-{}", id),
            category: "Bikes".to_string(),
            quantity: 1,
            unit_price: Decimal::from(total),
            line_total: Decimal::from(total),
        }
        .into()
    })
    .collect()
}

#[test]
fn test_default_session_snapshot() {
    let context = AppContext::from_dataset(dataset(), DashboardSettings::default());
    let snapshot = context.session().snapshot();

    assert_eq!(snapshot.kpis.total_revenue, Decimal::from(800));
    assert_eq!(snapshot.kpis.order_count, 2);
    assert_eq!(snapshot.kpis.average_order_value, Decimal::from(400));
    assert_eq!(snapshot.kpis.distinct_products, 2);

    let months: Vec<String> = snapshot
        .revenue_over_time
        .iter()
        .map(|b| b.bucket.label())
        .collect();
    assert_eq!(months, vec!["2024-01", "2024-02"]);
    assert_eq!(snapshot.top_products[0].product, "Mountain-100");
    assert_eq!(snapshot.revenue_by_region[0].region, "California");
    assert_eq!(snapshot.rows[0].order_id, 2);
}

#[test]
fn test_region_selection_narrows_every_view() {
    let context = AppContext::from_dataset(dataset(), DashboardSettings::default());
    let mut session = context.session();
    session.set_regions(["California"]);
    let snapshot = session.snapshot();

    assert_eq!(snapshot.kpis.total_revenue, Decimal::from(500));
    assert_eq!(snapshot.matched_rows, 1);
    assert_eq!(snapshot.total_rows, 2);
    assert_eq!(snapshot.revenue_over_time.len(), 1);
    assert_eq!(snapshot.top_products.len(), 1);
    assert_eq!(snapshot.revenue_by_region.len(), 1);
}

#[test]
fn test_no_match_gives_zeroed_snapshot() {
    let context = AppContext::from_dataset(dataset(), DashboardSettings::default());
    let mut session = context.session();
    session.set_date_range(Some(DateRange::new(
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2030, 12, 31).unwrap(),
    )));
    let snapshot = session.snapshot();

    assert_eq!(snapshot.kpis.total_revenue, Decimal::ZERO);
    assert_eq!(snapshot.kpis.order_count, 0);
    assert_eq!(snapshot.kpis.average_order_value, Decimal::ZERO);
    assert!(snapshot.revenue_over_time.is_empty());
    assert!(snapshot.top_products.is_empty());
    assert!(snapshot.category_share.is_empty());
    assert!(snapshot.revenue_by_region.is_empty());
    assert!(snapshot.rows.is_empty());
}

#[test]
fn test_lifting_the_date_bound() {
    let context = AppContext::from_dataset(dataset(), DashboardSettings::default());
    let mut session = context.session();
    session.set_date_range(Some(DateRange::new(
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
    )));
    assert_eq!(session.snapshot().matched_rows, 1);

    session.set_date_range(None);
    assert_eq!(session.snapshot().matched_rows, 2);
}

#[test]
fn test_configured_dashboard_defaults() {
    let settings = Settings::from_toml(
        r#"
[dashboard]
granularity = "quarter"
top_n = 5
top_n_min = 1
top_n_max = 20
"#,
    )
    .unwrap();
    let context = AppContext::from_dataset(dataset(), settings.dashboard);
    let mut session = context.session();

    assert_eq!(session.granularity(), Granularity::Quarter);
    assert_eq!(session.top_n(), 5);
    assert_eq!(session.set_top_n(1), 1);
    assert_eq!(session.snapshot().top_products.len(), 1);
    assert_eq!(session.snapshot().revenue_over_time[0].bucket.label(), "2024Q1");
}

#[test]
fn test_snapshot_json_shape() {
    let context = AppContext::from_dataset(dataset(), DashboardSettings::default());
    let json = serde_json::to_value(context.session().snapshot()).unwrap();

    assert_eq!(json["granularity"], "month");
    assert_eq!(json["top_n"], 10);
    assert_eq!(json["revenue_over_time"][0]["bucket"], "2024-01");
    assert_eq!(json["rows"][0]["year_month"], "2024-02");
    assert_eq!(json["kpis"]["order_count"], 2);
}
