//! Filter engine.
//!
//! A [`FilterPredicate`] combines a date range with category, product and
//! region selections using AND. [`filter`] never touches the base records;
//! it returns a [`FilteredView`] that borrows them.
//!
//! Selections are membership tests, so an empty set matches nothing. The
//! identity predicate is the one that selects every known value, built with
//! [`FilterPredicate::select_all`].

use std::collections::{BTreeSet, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::SalesLineRecord;

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start <= day(at) <= end`; the whole end day is included.
    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        let day = at.date();
        self.start <= day && day <= self.end
    }
}

/// User selections applied to the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// `None` while the date selection is incomplete. The predicate then
    /// matches every record and the set selections below are ignored.
    pub date_range: Option<DateRange>,
    pub categories: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

impl FilterPredicate {
    /// Select every value and the full date span listed in `options`.
    pub fn select_all(options: &FilterOptions) -> Self {
        Self {
            date_range: options.date_bounds,
            categories: options.categories.iter().cloned().collect(),
            products: options.products.iter().cloned().collect(),
            regions: options.regions.iter().cloned().collect(),
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn without_date_range(mut self) -> Self {
        self.date_range = None;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether an empty selection set empties every view.
    ///
    /// Always false without a date range, since nothing is filtered then.
    pub fn selects_nothing(&self) -> bool {
        self.date_range.is_some()
            && (self.categories.is_empty() || self.products.is_empty() || self.regions.is_empty())
    }

    pub fn matches(&self, record: &SalesLineRecord) -> bool {
        let Some(range) = self.date_range else {
            return true;
        };
        range.contains(&record.order_date)
            && self.categories.contains(&record.category)
            && self.products.contains(&record.product_name)
            && self.regions.contains(&record.region)
    }
}

/// Choices the presentation layer offers for each filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct categories, in first-appearance order.
    pub categories: Vec<String>,
    /// Distinct product names, in first-appearance order.
    pub products: Vec<String>,
    /// Distinct region names, in first-appearance order.
    pub regions: Vec<String>,
    /// First and last order day; `None` for an empty record set.
    pub date_bounds: Option<DateRange>,
}

impl FilterOptions {
    pub fn from_records(records: &[SalesLineRecord]) -> Self {
        let mut options = FilterOptions::default();
        let mut seen_categories = HashSet::new();
        let mut seen_products = HashSet::new();
        let mut seen_regions = HashSet::new();

        for record in records {
            if seen_categories.insert(record.category.as_str()) {
                options.categories.push(record.category.clone());
            }
            if seen_products.insert(record.product_name.as_str()) {
                options.products.push(record.product_name.clone());
            }
            if seen_regions.insert(record.region.as_str()) {
                options.regions.push(record.region.clone());
            }

            let day = record.order_day();
            options.date_bounds = Some(match options.date_bounds {
                Some(range) => DateRange::new(range.start.min(day), range.end.max(day)),
                None => DateRange::new(day, day),
            });
        }

        options
    }
}

/// Read-only subset of a base record set.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    base: &'a [SalesLineRecord],
    predicate: FilterPredicate,
    rows: Vec<&'a SalesLineRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    /// Matching records, in base order.
    pub fn records(&self) -> &[&'a SalesLineRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a SalesLineRecord>> {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Size of the record set this view was taken from.
    pub fn base_len(&self) -> usize {
        self.base.len()
    }

    /// Matching records, newest order first; ties keep base order.
    pub fn newest_first(&self) -> Vec<&'a SalesLineRecord> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        rows
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a SalesLineRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a SalesLineRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}

/// Apply `predicate` to `records`.
pub fn filter<'a>(records: &'a [SalesLineRecord], predicate: &FilterPredicate) -> FilteredView<'a> {
    let rows: Vec<&SalesLineRecord> = records.iter().filter(|r| predicate.matches(r)).collect();
    debug!(
        base = records.len(),
        matched = rows.len(),
        "filter applied"
    );
    FilteredView {
        base: records,
        predicate: predicate.clone(),
        rows,
    }
}
