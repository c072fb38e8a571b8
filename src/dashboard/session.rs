// src/dashboard/session.rs
use std::sync::Arc;

use serde::Serialize;

use crate::config::DashboardSettings;
use crate::filter::{filter, DateRange, FilterOptions, FilterPredicate, FilteredView};
use crate::model::{Dataset, Granularity, SalesLineRecord};
use crate::report::{
    category_share, revenue_by_product, revenue_by_region, revenue_by_time_bucket,
    BucketRevenue, CategoryShare, Kpis, ProductRevenue, RegionRevenue,
};

/// Per-user dashboard state over a shared, read-only dataset.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    options: Arc<FilterOptions>,
    settings: DashboardSettings,
    predicate: FilterPredicate,
    granularity: Granularity,
    top_n: usize,
}

/// Everything the presentation layer draws for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub granularity: Granularity,
    pub top_n: usize,
    pub kpis: Kpis,
    pub revenue_over_time: Vec<BucketRevenue>,
    pub top_products: Vec<ProductRevenue>,
    /// Split of `top_products` by category.
    pub category_share: Vec<CategoryShare>,
    pub revenue_by_region: Vec<RegionRevenue>,
    /// Matching records, newest order first.
    pub rows: Vec<SalesLineRecord>,
    pub matched_rows: usize,
    pub total_rows: usize,
}

impl Session {
    pub(crate) fn new(
        dataset: Arc<Dataset>,
        options: Arc<FilterOptions>,
        settings: DashboardSettings,
    ) -> Self {
        let predicate = FilterPredicate::select_all(&options);
        let top_n = settings.clamp_top_n(settings.top_n);
        Self {
            dataset,
            options,
            granularity: settings.granularity,
            settings,
            predicate,
            top_n,
        }
    }

    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn set_predicate(&mut self, predicate: FilterPredicate) {
        self.predicate = predicate;
    }

    /// `None` marks the date selection incomplete, which shows every record.
    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.predicate.date_range = range;
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicate.categories = categories.into_iter().map(Into::into).collect();
    }

    pub fn set_products<I, S>(&mut self, products: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicate.products = products.into_iter().map(Into::into).collect();
    }

    pub fn set_regions<I, S>(&mut self, regions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicate.regions = regions.into_iter().map(Into::into).collect();
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Set the ranking size, clamped to the configured bounds. Returns the
    /// value actually applied.
    pub fn set_top_n(&mut self, requested: usize) -> usize {
        self.top_n = self.settings.clamp_top_n(requested);
        self.top_n
    }

    /// Back to every value selected and the full date span.
    pub fn reset(&mut self) {
        self.predicate = FilterPredicate::select_all(&self.options);
        self.granularity = self.settings.granularity;
        self.top_n = self.settings.clamp_top_n(self.settings.top_n);
    }

    pub fn view(&self) -> FilteredView<'_> {
        filter(self.dataset.records(), &self.predicate)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let view = self.view();
        let top_products = revenue_by_product(&view, self.top_n);
        let category_share = category_share(&top_products);

        DashboardSnapshot {
            granularity: self.granularity,
            top_n: self.top_n,
            kpis: Kpis::compute(&view),
            revenue_over_time: revenue_by_time_bucket(&view, self.granularity),
            top_products,
            category_share,
            revenue_by_region: revenue_by_region(&view),
            rows: view.newest_first().into_iter().cloned().collect(),
            matched_rows: view.len(),
            total_rows: view.base_len(),
        }
    }
}
