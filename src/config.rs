use crate::error::ConfigError;
use crate::types::Column;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data.xlsx";
pub const DEFAULT_SHEET: &str = "Sheet1";
pub const DEFAULT_TARGET: f64 = 3_000_000_000.0;
pub const DEFAULT_CURRENCY: &str = "KSH";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Everything the dashboard needs besides the user's filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub sheet: String,
    /// Investment amount the progress page measures against.
    pub target: f64,
    pub currency: String,
    /// Columns shown in the database table.
    pub display_columns: Vec<Column>,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            sheet: DEFAULT_SHEET.to_string(),
            target: DEFAULT_TARGET,
            currency: DEFAULT_CURRENCY.to_string(),
            display_columns: Column::ALL.to_vec(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target.is_finite() && self.target > 0.0) {
            return Err(ConfigError::NonPositiveTarget(self.target));
        }
        if self.sheet.trim().is_empty() {
            return Err(ConfigError::Empty("sheet name"));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Empty("currency label"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.target, 3_000_000_000.0);
        assert_eq!(cfg.display_columns.len(), 11);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_target() {
        let cfg = DashboardConfig {
            target: 0.0,
            ..DashboardConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveTarget(0.0)));
        let cfg = DashboardConfig {
            target: -10.0,
            ..DashboardConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_blank_labels() {
        let cfg = DashboardConfig {
            sheet: "  ".into(),
            ..DashboardConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Empty("sheet name")));
    }
}
