//! Filter and summarize a spreadsheet of insurance policies.
//!
//! ```text
//!  data.xlsx / data.csv
//!        │  loader::load
//!        ▼
//!     Dataset ──── filter::filter(selection) ───▶ FilteredView
//!                                                   │
//!                     aggregate::{summarize, group_count, progress}
//!                                                   ▼
//!                                        dashboard::DashboardView
//! ```
pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod session;
pub mod types;
pub mod util;

pub use aggregate::{group_count, progress, summarize};
pub use config::DashboardConfig;
pub use dashboard::{compute, DashboardSnapshot, DashboardView};
pub use dataset::Dataset;
pub use error::{AggregationError, ConfigError, DashboardError, FilterError, LoadError};
pub use filter::{filter, FilterSelection, FilteredView};
pub use loader::{load, LoadReport};
pub use session::Session;
