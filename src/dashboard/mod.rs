//! Application context and per-user sessions.
//!
//! The dataset is loaded once and shared read-only behind an `Arc`. Each
//! [`Session`] keeps its own predicate and chart settings, so concurrent
//! users never see each other's selections and no locking is needed.

mod session;

pub use session::{DashboardSnapshot, Session};

use std::sync::Arc;

use tracing::info;

use crate::config::DashboardSettings;
use crate::filter::FilterOptions;
use crate::loader;
use crate::model::Dataset;
use crate::source::{DataResult, DatabaseClient};

#[derive(Debug, Clone)]
pub struct AppContext {
    dataset: Arc<Dataset>,
    options: Arc<FilterOptions>,
    settings: DashboardSettings,
}

impl AppContext {
    /// Load the dataset through `client` and build the context around it.
    pub async fn load(
        client: &dyn DatabaseClient,
        settings: DashboardSettings,
    ) -> DataResult<Self> {
        let dataset = loader::load(client).await?;
        Ok(Self::from_dataset(dataset, settings))
    }

    pub fn from_dataset(dataset: Dataset, settings: DashboardSettings) -> Self {
        let options = FilterOptions::from_records(dataset.records());
        info!(
            rows = dataset.len(),
            categories = options.categories.len(),
            products = options.products.len(),
            regions = options.regions.len(),
            "dashboard context ready"
        );
        Self {
            dataset: Arc::new(dataset),
            options: Arc::new(options),
            settings,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// A fresh session with every value selected.
    pub fn session(&self) -> Session {
        Session::new(
            Arc::clone(&self.dataset),
            Arc::clone(&self.options),
            self.settings,
        )
    }
}
