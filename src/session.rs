use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::loader::{self, LoadReport};
use once_cell::unsync::OnceCell;

/// Holds the configuration and loads the dataset on first use.
///
/// The dataset is read at most once per session; every later call hands out
/// the same immutable handle.
pub struct Session {
    config: DashboardConfig,
    loaded: OnceCell<(Dataset, LoadReport)>,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        Session {
            config,
            loaded: OnceCell::new(),
        }
    }

    /// Session over an already built dataset (nothing is read from disk).
    pub fn with_dataset(config: DashboardConfig, dataset: Dataset) -> Self {
        let report = LoadReport {
            total_rows: dataset.len(),
            loaded_rows: dataset.len(),
            skipped_rows: 0,
        };
        Session {
            config,
            loaded: OnceCell::with_value((dataset, report)),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DashboardConfig {
        &mut self.config
    }

    pub fn dataset(&self) -> Result<&Dataset, LoadError> {
        self.load().map(|(dataset, _)| dataset)
    }

    pub fn load_report(&self) -> Result<&LoadReport, LoadError> {
        self.load().map(|(_, report)| report)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    fn load(&self) -> Result<&(Dataset, LoadReport), LoadError> {
        self.loaded
            .get_or_try_init(|| loader::load(&self.config.data_path, &self.config.sheet))
    }
}
