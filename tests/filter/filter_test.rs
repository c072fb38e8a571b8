//! Integration tests for the filter engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use salesboard::filter::{filter, DateRange, FilterOptions, FilterPredicate};
use salesboard::model::{Dataset, SalesLine};
use salesboard::report::total_revenue;

fn dataset() -> Dataset {
    [
        (1, (2024, 1, 15), "Bikes", "Mountain-100", "California", 500),
        (2, (2024, 2, 10), "Bikes", "Road-150", "Texas", 300),
        (3, (2024, 2, 29), "Clothing", "Jersey", "California", 45),
        (4, (2024, 3, 1), "Accessories", "Helmet", "Ohio", 35),
    ]
    .into_iter()
    .map(|(id, (y, m, d), category, product, region, total)| {
        SalesLine {
            order_id: id,
            order_date: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(16, 45, 0)
                .unwrap(),
            total_due: Decimal::from(total),
            region: region.to_string(),
            product_name: product.to_string(),
            product_number: format!("P-{}", id),
            category: category.to_string(),
            quantity: 1,
            unit_price: Decimal::from(total),
            line_total: Decimal::from(total),
        }
        .into()
    })
    .collect()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_select_all_reproduces_base_set() {
    let data = dataset();
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(data.records()));
    let view = filter(data.records(), &predicate);

    assert_eq!(view.len(), data.len());
    for (kept, base) in view.iter().zip(data.iter()) {
        assert!(std::ptr::eq(kept, base));
    }
}

#[test]
fn test_region_filter_scenario() {
    let data = dataset();
    let records = &data.records()[..2];
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(records))
        .with_regions(["California"]);

    let view = filter(records, &predicate);
    assert_eq!(view.len(), 1);
    assert_eq!(total_revenue(&view), Decimal::from(500));
}

#[test]
fn test_predicates_combine_with_and() {
    let data = dataset();
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(data.records()))
        .with_regions(["California"])
        .with_categories(["Clothing"]);

    let ids: Vec<i64> = filter(data.records(), &predicate)
        .iter()
        .map(|r| r.order_id)
        .collect();
    assert_eq!(ids, vec![3]);
}

#[test]
fn test_date_range_includes_whole_end_day() {
    let data = dataset();
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(data.records()))
        .with_date_range(DateRange::new(day(2024, 2, 1), day(2024, 2, 29)));

    // Order 3 was placed late in the afternoon of the end day
    let ids: Vec<i64> = filter(data.records(), &predicate)
        .iter()
        .map(|r| r.order_id)
        .collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_empty_selection_matches_nothing() {
    let data = dataset();
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(data.records()))
        .with_products(Vec::<String>::new());

    assert!(predicate.selects_nothing());
    let view = filter(data.records(), &predicate);
    assert!(view.is_empty());
    assert_eq!(view.base_len(), 4);
    assert_eq!(total_revenue(&view), Decimal::ZERO);
}

#[test]
fn test_incomplete_date_selection_shows_everything() {
    let data = dataset();
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(data.records()))
        .with_regions(["California"])
        .with_categories(["Clothing"]);
    assert_eq!(filter(data.records(), &predicate).len(), 1);

    let predicate = predicate.without_date_range();
    let view = filter(data.records(), &predicate);
    assert_eq!(view.len(), 4);
    assert_eq!(total_revenue(&view), Decimal::from(880));
}

#[test]
fn test_filtering_leaves_base_untouched() {
    let data = dataset();
    let before = data.clone();
    let predicate = FilterPredicate::select_all(&FilterOptions::from_records(data.records()))
        .with_regions(["Ohio"]);

    let first = filter(data.records(), &predicate).len();
    let second = filter(data.records(), &predicate).len();

    assert_eq!(first, 1);
    assert_eq!(first, second);
    assert_eq!(data, before);
}

#[test]
fn test_options_describe_dataset() {
    let data = dataset();
    let options = FilterOptions::from_records(data.records());

    assert_eq!(options.categories, vec!["Bikes", "Clothing", "Accessories"]);
    assert_eq!(options.regions, vec!["California", "Texas", "Ohio"]);
    assert_eq!(options.products.len(), 4);
    assert_eq!(
        options.date_bounds,
        Some(DateRange::new(day(2024, 1, 15), day(2024, 3, 1)))
    );
}
