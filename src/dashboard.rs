use crate::aggregate::{group_count, progress, summarize};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::filter::{filter, FilterSelection, FilteredView};
use crate::types::{
    GroupKey, GroupOrder, GroupedCount, Measure, ProgressRatio, SummaryStats,
};
use serde::Serialize;

/// Everything derived from one filter selection.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub view: FilteredView<'a>,
    pub summary: SummaryStats,
    /// Row count per business type, ascending by count (bar chart).
    pub by_business_type: GroupedCount,
    /// Row count per state, ascending by state (line chart).
    pub by_state: GroupedCount,
    /// Rating total per state (pie chart).
    pub rating_by_state: GroupedCount,
    pub progress: ProgressRatio,
}

/// Recompute every derived view for `selection`.
pub fn compute<'a>(
    dataset: &'a Dataset,
    selection: &FilterSelection,
    config: &DashboardConfig,
) -> Result<DashboardView<'a>, DashboardError> {
    config.validate()?;
    let view = filter(dataset, selection);
    let summary = summarize(&view);
    let by_business_type = group_count(
        &view,
        GroupKey::BusinessType,
        Measure::RowCount,
        GroupOrder::ByValue,
    );
    let by_state = group_count(&view, GroupKey::State, Measure::RowCount, GroupOrder::ByKey);
    let rating_by_state = group_count(&view, GroupKey::State, Measure::RatingSum, GroupOrder::ByKey);
    let progress = progress(&view, config.target)?;
    Ok(DashboardView {
        view,
        summary,
        by_business_type,
        by_state,
        rating_by_state,
        progress,
    })
}

#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub selection: &'a FilterSelection,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub summary: &'a SummaryStats,
    pub by_business_type: &'a GroupedCount,
    pub by_state: &'a GroupedCount,
    pub rating_by_state: &'a GroupedCount,
    pub progress: &'a ProgressRatio,
}

impl<'a> DashboardView<'a> {
    pub fn snapshot<'s>(
        &'s self,
        dataset: &Dataset,
        selection: &'s FilterSelection,
    ) -> DashboardSnapshot<'s> {
        DashboardSnapshot {
            selection,
            total_rows: dataset.len(),
            filtered_rows: self.view.len(),
            summary: &self.summary,
            by_business_type: &self.by_business_type,
            by_state: &self.by_state,
            rating_by_state: &self.rating_by_state,
            progress: &self.progress,
        }
    }
}
