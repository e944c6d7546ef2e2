use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension '{extension}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error(
        "sheet '{sheet}' not found in {} (available: {})",
        .path.display(),
        .available.join(", ")
    )]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unrecognized column '{0}'")]
    UnknownColumn(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("no data: {statistic} is undefined for an empty selection")]
    NoData { statistic: &'static str },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("progress target must be a positive amount, got {0}")]
    NonPositiveTarget(f64),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Every failure the dashboard can surface to the user.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DashboardError {
    /// Short headline shown above the error detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::Load(_) => "The dataset could not be loaded.",
            DashboardError::Filter(_) => "One or more filter options are invalid.",
            DashboardError::Aggregation(_) => {
                "One or more options are mandatory: the current selection has no data."
            }
            DashboardError::Config(_) => "The dashboard configuration is invalid.",
        }
    }
}
