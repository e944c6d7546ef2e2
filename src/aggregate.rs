use crate::error::{AggregationError, ConfigError};
use crate::filter::FilteredView;
use crate::types::{
    GroupEntry, GroupKey, GroupOrder, GroupedCount, Measure, ProgressRatio, ProgressStatus,
    SummaryStats,
};
use crate::util::{mean, median, mode};
use log::debug;
use std::collections::HashMap;

pub fn summarize(view: &FilteredView<'_>) -> SummaryStats {
    let investments = view.investments();
    let stats = SummaryStats {
        row_count: view.len(),
        investment_sum: investments.iter().fold(0.0, |acc, v| acc + v),
        investment_mean: mean(&investments),
        investment_median: median(investments.clone()),
        investment_mode: mode(investments),
        rating_sum: view.rows().iter().fold(0.0, |acc, r| acc + r.rating),
    };
    debug!("summary over {} rows: {:?}", stats.row_count, stats);
    stats
}

impl SummaryStats {
    pub fn mean(&self) -> Result<f64, AggregationError> {
        self.investment_mean
            .ok_or(AggregationError::NoData { statistic: "mean" })
    }

    pub fn median(&self) -> Result<f64, AggregationError> {
        self.investment_median
            .ok_or(AggregationError::NoData { statistic: "median" })
    }

    pub fn mode(&self) -> Result<f64, AggregationError> {
        self.investment_mode
            .ok_or(AggregationError::NoData { statistic: "mode" })
    }

    pub fn has_data(&self) -> bool {
        self.row_count > 0
    }
}

/// One entry per distinct `key` value in the view.
///
/// `Measure::RowCount` counts rows, `Measure::RatingSum` adds up Rating.
pub fn group_count(
    view: &FilteredView<'_>,
    key: GroupKey,
    measure: Measure,
    order: GroupOrder,
) -> GroupedCount {
    let mut acc: HashMap<&str, f64> = HashMap::new();
    for r in view.rows() {
        let e = acc.entry(r.group_value(key)).or_insert(0.0);
        *e += match measure {
            Measure::RowCount => 1.0,
            Measure::RatingSum => r.rating,
        };
    }

    let mut entries: Vec<GroupEntry> = acc
        .into_iter()
        .map(|(label, value)| GroupEntry {
            label: label.to_string(),
            value,
        })
        .collect();
    match order {
        GroupOrder::ByValue => entries.sort_by(|a, b| {
            a.value
                .total_cmp(&b.value)
                .then_with(|| a.label.cmp(&b.label))
        }),
        GroupOrder::ByKey => entries.sort_by(|a, b| a.label.cmp(&b.label)),
    }

    GroupedCount {
        key,
        measure,
        order,
        entries,
    }
}

/// Investment total of the view as a rounded percentage of `target`.
pub fn progress(view: &FilteredView<'_>, target: f64) -> Result<ProgressRatio, ConfigError> {
    if !(target.is_finite() && target > 0.0) {
        return Err(ConfigError::NonPositiveTarget(target));
    }
    let current = view.rows().iter().fold(0.0, |acc, r| acc + r.investment);
    let ratio = (current / target * 100.0).round() as i64;
    let status = if ratio > 100 {
        ProgressStatus::Achieved
    } else {
        ProgressStatus::InProgress {
            percent: ratio.clamp(0, 100) as u8,
        }
    };
    Ok(ProgressRatio {
        current,
        target,
        ratio,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{fixtures::record, Dataset};
    use crate::filter::{filter, FilterSelection};
    use crate::types::{FilterColumn, Record};

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("A", "Urban", "Frame", 100.0),
            record("A", "Rural", "Masonry", 200.0),
            record("B", "Urban", "Frame", 300.0),
        ])
    }

    fn with_state(state: &str, business: &str, rating: f64) -> Record {
        let mut r = record("A", "Urban", "Frame", 10.0);
        r.state = state.to_string();
        r.business_type = business.to_string();
        r.rating = rating;
        r
    }

    #[test]
    fn region_a_scenario() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::Region, ["A"]);
        let view = filter(&ds, &sel);
        let stats = summarize(&view);
        assert_eq!(view.len(), 2);
        assert_eq!(stats.investment_sum, 300.0);
        assert_eq!(stats.mean(), Ok(150.0));
        assert_eq!(stats.median(), Ok(150.0));
        assert_eq!(stats.mode(), Ok(100.0));
        assert_eq!(stats.rating_sum, 2.0);
    }

    #[test]
    fn empty_view_reports_no_data() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::Construction, Vec::<String>::new());
        let view = filter(&ds, &sel);
        let stats = summarize(&view);
        assert_eq!(view.len(), 0);
        assert_eq!(stats.investment_sum, 0.0);
        assert_eq!(stats.rating_sum, 0.0);
        assert!(!stats.has_data());
        assert_eq!(
            stats.mean(),
            Err(AggregationError::NoData { statistic: "mean" })
        );
        assert!(stats.median().is_err());
        assert!(stats.mode().is_err());
    }

    #[test]
    fn empty_view_totals_are_positive_zero() {
        let ds = sample();
        let view = filter(&ds, &FilterSelection::none());
        let stats = summarize(&view);
        assert!(!stats.investment_sum.is_sign_negative());
        assert!(!stats.rating_sum.is_sign_negative());

        let p = progress(&view, 1000.0).expect("progress");
        assert!(!p.current.is_sign_negative());
        assert_eq!(p.status, ProgressStatus::InProgress { percent: 0 });

        let g = group_count(&view, GroupKey::State, Measure::RatingSum, GroupOrder::ByKey);
        assert!(!g.total().is_sign_negative());
    }

    #[test]
    fn group_counts_sum_to_view_length() {
        let ds = Dataset::from_records(vec![
            with_state("Kisumu", "Retail", 2.0),
            with_state("Nairobi", "Office", 3.0),
            with_state("Kisumu", "Retail", 4.0),
            with_state("Eldoret", "Retail", 1.0),
        ]);
        let view = filter(&ds, &FilterSelection::all(&ds));

        let by_state = group_count(&view, GroupKey::State, Measure::RowCount, GroupOrder::ByKey);
        assert_eq!(by_state.total() as usize, view.len());
        let labels: Vec<&str> = by_state.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Eldoret", "Kisumu", "Nairobi"]);

        let by_type = group_count(
            &view,
            GroupKey::BusinessType,
            Measure::RowCount,
            GroupOrder::ByValue,
        );
        assert_eq!(by_type.entries[0].label, "Office");
        assert_eq!(by_type.entries[1].value, 3.0);

        let rating = group_count(&view, GroupKey::State, Measure::RatingSum, GroupOrder::ByKey);
        assert_eq!(rating.entries[1].value, 6.0);
        assert_eq!(rating.total(), 10.0);
    }

    #[test]
    fn value_ties_fall_back_to_key_order() {
        let ds = Dataset::from_records(vec![
            with_state("S", "Warehouse", 1.0),
            with_state("S", "Bakery", 1.0),
        ]);
        let view = filter(&ds, &FilterSelection::all(&ds));
        let g = group_count(
            &view,
            GroupKey::BusinessType,
            Measure::RowCount,
            GroupOrder::ByValue,
        );
        assert_eq!(g.entries[0].label, "Bakery");
        assert_eq!(g.entries[1].label, "Warehouse");
    }

    #[test]
    fn progress_at_target_is_exactly_one_hundred() {
        let ds = sample();
        let view = filter(&ds, &FilterSelection::all(&ds));
        let p = progress(&view, 600.0).expect("progress");
        assert_eq!(p.ratio, 100);
        assert_eq!(p.status, ProgressStatus::InProgress { percent: 100 });
    }

    #[test]
    fn progress_over_target_is_achieved() {
        let ds = Dataset::from_records(vec![
            record("A", "Urban", "Frame", 700.0),
            record("A", "Urban", "Frame", 500.0),
        ]);
        let view = filter(&ds, &FilterSelection::all(&ds));
        let p = progress(&view, 1000.0).expect("progress");
        assert_eq!(p.ratio, 120);
        assert_eq!(p.status, ProgressStatus::Achieved);
    }

    #[test]
    fn progress_rounds_and_rejects_bad_targets() {
        let ds = sample();
        let view = filter(&ds, &FilterSelection::all(&ds));
        let p = progress(&view, 3_000_000_000.0).expect("progress");
        assert_eq!(p.status, ProgressStatus::InProgress { percent: 0 });
        let p = progress(&view, 1800.0).expect("progress");
        assert_eq!(p.ratio, 33);

        assert_eq!(progress(&view, 0.0), Err(ConfigError::NonPositiveTarget(0.0)));
        assert!(progress(&view, -5.0).is_err());
        assert!(progress(&view, f64::NAN).is_err());
    }
}
