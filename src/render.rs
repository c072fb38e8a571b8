//! Plain-text rendering for the command-line front end.

use std::fmt::Write;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::dashboard::DashboardSnapshot;
use crate::filter::FilterOptions;
use crate::model::SalesLineRecord;
use crate::report::{format_count, format_currency, format_value};

/// KPI block followed by the four chart tables.
pub fn render_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let kpis = &snapshot.kpis;

    let _ = writeln!(out, "Total revenue    {}", format_value(kpis.total_revenue));
    let _ = writeln!(out, "Orders           {}", format_count(kpis.order_count));
    let _ = writeln!(out, "Avg order value  {}", format_currency(kpis.average_order_value));
    let _ = writeln!(out, "Products sold    {}", kpis.distinct_products);
    let _ = writeln!(
        out,
        "Rows             {} of {}",
        format_count(snapshot.matched_rows),
        format_count(snapshot.total_rows)
    );

    section(
        &mut out,
        &format!("Revenue by {}", snapshot.granularity),
        snapshot
            .revenue_over_time
            .iter()
            .map(|b| (b.bucket.label(), format_currency(b.revenue))),
    );
    section(
        &mut out,
        &format!("Top {} products", snapshot.top_n),
        snapshot.top_products.iter().map(|p| {
            (
                format!("{} / {}", p.category, p.product),
                format_currency(p.revenue),
            )
        }),
    );
    section(
        &mut out,
        "Category share",
        snapshot.category_share.iter().map(|c| {
            (
                c.category.clone(),
                format!("{}  {:>6}", format_currency(c.revenue), percent(c.share)),
            )
        }),
    );
    section(
        &mut out,
        "Revenue by region",
        snapshot
            .revenue_by_region
            .iter()
            .map(|r| (r.region.clone(), format_currency(r.revenue))),
    );

    out
}

/// Filter choices and the date span of the dataset.
pub fn render_options(options: &FilterOptions) -> String {
    let mut out = String::new();
    match options.date_bounds {
        Some(range) => {
            let _ = writeln!(out, "Dates: {} to {}", range.start, range.end);
        }
        None => {
            let _ = writeln!(out, "Dates: none");
        }
    }
    list(&mut out, "Categories", &options.categories);
    list(&mut out, "Products", &options.products);
    list(&mut out, "Regions", &options.regions);
    out
}

/// One line per record, at most `limit` of them.
pub fn render_rows<'a, I>(rows: I, limit: usize) -> String
where
    I: IntoIterator<Item = &'a SalesLineRecord>,
{
    let mut out = String::new();
    for record in rows.into_iter().take(limit) {
        let _ = writeln!(
            out,
            "{}  {:>6}  {}  {} ({})  {}  {} x {} = {}",
            record.order_date.format("%Y-%m-%d"),
            record.order_id,
            record.region,
            record.product_name,
            record.category,
            record.product_number,
            record.quantity,
            format_currency(record.unit_price),
            format_currency(record.line_total),
        );
    }
    out
}

fn section<I>(out: &mut String, title: &str, rows: I)
where
    I: Iterator<Item = (String, String)>,
{
    let rows: Vec<(String, String)> = rows.collect();
    let _ = writeln!(out, "\n{}", title);
    if rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<width$}  {}", label, value, width = width);
    }
}

fn list(out: &mut String, title: &str, values: &[String]) {
    let _ = writeln!(out, "{} ({}):", title, values.len());
    for value in values {
        let _ = writeln!(out, "  {}", value);
    }
}

fn percent(share: Decimal) -> String {
    let mut pct = (share * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
    pct.rescale(1);
    format!("{}%", pct)
}
