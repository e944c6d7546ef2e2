use crate::error::FilterError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One row as it comes out of the sheet, before cleaning. Every cell is kept
/// as text so CSV and workbook input share a single cleaning path.
#[derive(Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Policy")]
    pub policy: Option<String>,
    #[serde(rename = "Expiry")]
    pub expiry: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Investment")]
    pub investment: Option<String>,
    #[serde(rename = "Construction")]
    pub construction: Option<String>,
    #[serde(rename = "BusinessType")]
    pub business_type: Option<String>,
    #[serde(rename = "Earthquake")]
    pub earthquake: Option<String>,
    #[serde(rename = "Flood")]
    pub flood: Option<String>,
    #[serde(rename = "Rating")]
    pub rating: Option<String>,
}

impl RawRow {
    pub fn is_blank(&self) -> bool {
        Column::ALL.iter().all(|c| {
            self.get(*c)
                .map(|s| s.trim().is_empty())
                .unwrap_or(true)
        })
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        let v = match column {
            Column::Policy => &self.policy,
            Column::Expiry => &self.expiry,
            Column::Location => &self.location,
            Column::State => &self.state,
            Column::Region => &self.region,
            Column::Investment => &self.investment,
            Column::Construction => &self.construction,
            Column::BusinessType => &self.business_type,
            Column::Earthquake => &self.earthquake,
            Column::Flood => &self.flood,
            Column::Rating => &self.rating,
        };
        v.as_deref()
    }

    pub fn set(&mut self, column: Column, value: String) {
        let slot = match column {
            Column::Policy => &mut self.policy,
            Column::Expiry => &mut self.expiry,
            Column::Location => &mut self.location,
            Column::State => &mut self.state,
            Column::Region => &mut self.region,
            Column::Investment => &mut self.investment,
            Column::Construction => &mut self.construction,
            Column::BusinessType => &mut self.business_type,
            Column::Earthquake => &mut self.earthquake,
            Column::Flood => &mut self.flood,
            Column::Rating => &mut self.rating,
        };
        *slot = Some(value);
    }
}

/// A cleaned policy record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "Policy")]
    pub policy: String,
    #[serde(rename = "Expiry")]
    pub expiry: Option<NaiveDate>,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Investment")]
    pub investment: f64,
    #[serde(rename = "Construction")]
    pub construction: String,
    #[serde(rename = "BusinessType")]
    pub business_type: String,
    #[serde(rename = "Earthquake")]
    pub earthquake: String,
    #[serde(rename = "Flood")]
    pub flood: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

impl Record {
    pub fn filter_value(&self, column: FilterColumn) -> &str {
        match column {
            FilterColumn::Region => &self.region,
            FilterColumn::Location => &self.location,
            FilterColumn::Construction => &self.construction,
        }
    }

    pub fn group_value(&self, key: GroupKey) -> &str {
        match key {
            GroupKey::BusinessType => &self.business_type,
            GroupKey::State => &self.state,
        }
    }

    /// Text rendering of a single cell for the database table.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Policy => self.policy.clone(),
            Column::Expiry => self
                .expiry
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            Column::Location => self.location.clone(),
            Column::State => self.state.clone(),
            Column::Region => self.region.clone(),
            Column::Investment => crate::util::format_plain(self.investment),
            Column::Construction => self.construction.clone(),
            Column::BusinessType => self.business_type.clone(),
            Column::Earthquake => self.earthquake.clone(),
            Column::Flood => self.flood.clone(),
            Column::Rating => crate::util::format_plain(self.rating),
        }
    }
}

/// The fixed schema of the policy sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    Policy,
    Expiry,
    Location,
    State,
    Region,
    Investment,
    Construction,
    BusinessType,
    Earthquake,
    Flood,
    Rating,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Policy,
        Column::Expiry,
        Column::Location,
        Column::State,
        Column::Region,
        Column::Investment,
        Column::Construction,
        Column::BusinessType,
        Column::Earthquake,
        Column::Flood,
        Column::Rating,
    ];

    /// Header name as it appears in the sheet.
    pub fn name(self) -> &'static str {
        match self {
            Column::Policy => "Policy",
            Column::Expiry => "Expiry",
            Column::Location => "Location",
            Column::State => "State",
            Column::Region => "Region",
            Column::Investment => "Investment",
            Column::Construction => "Construction",
            Column::BusinessType => "BusinessType",
            Column::Earthquake => "Earthquake",
            Column::Flood => "Flood",
            Column::Rating => "Rating",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FilterError::UnknownColumn(s.to_string()))
    }
}

/// Columns the user can restrict with a multiselect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FilterColumn {
    Region,
    Location,
    Construction,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 3] = [
        FilterColumn::Region,
        FilterColumn::Location,
        FilterColumn::Construction,
    ];

    pub fn column(self) -> Column {
        match self {
            FilterColumn::Region => Column::Region,
            FilterColumn::Location => Column::Location,
            FilterColumn::Construction => Column::Construction,
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column().name())
    }
}

impl FromStr for FilterColumn {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FilterColumn::ALL
            .iter()
            .copied()
            .find(|c| c.column().name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FilterError::UnknownColumn(s.to_string()))
    }
}

/// Categorical columns the charts group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKey {
    BusinessType,
    State,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::BusinessType => f.write_str("BusinessType"),
            GroupKey::State => f.write_str("State"),
        }
    }
}

/// What a group entry measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    RowCount,
    RatingSum,
}

/// How group entries are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupOrder {
    /// Ascending by value, ties broken by key.
    ByValue,
    /// Ascending by key (categorical axis).
    ByKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedCount {
    pub key: GroupKey,
    pub measure: Measure,
    pub order: GroupOrder,
    pub entries: Vec<GroupEntry>,
}

impl GroupedCount {
    pub fn total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| acc + e.value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scalar statistics over a filtered view. `None` means the view was empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub row_count: usize,
    pub investment_sum: f64,
    pub investment_mean: Option<f64>,
    pub investment_median: Option<f64>,
    pub investment_mode: Option<f64>,
    pub rating_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgressStatus {
    InProgress { percent: u8 },
    Achieved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRatio {
    pub current: f64,
    pub target: f64,
    /// Rounded percentage; may exceed 100 or be negative.
    pub ratio: i64,
    pub status: ProgressStatus,
}

/// Row of the metric panel.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub title: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Row of a chart's data table.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[tabled(rename = "Category")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Share")]
    pub share: String,
}
