use crate::dataset::Dataset;
use crate::error::FilterError;
use crate::types::{FilterColumn, Record};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

static NOTHING: BTreeSet<String> = BTreeSet::new();

/// Accepted values for each of the three filter columns.
///
/// Every filter column is always present. An empty set accepts nothing, so
/// selecting no value for any column empties the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    accepted: BTreeMap<FilterColumn, BTreeSet<String>>,
}

impl FilterSelection {
    /// Everything the dataset contains is accepted (no filtering).
    pub fn all(dataset: &Dataset) -> Self {
        let accepted: BTreeMap<FilterColumn, BTreeSet<String>> = FilterColumn::ALL
            .iter()
            .map(|c| (*c, dataset.distinct(*c).iter().cloned().collect()))
            .collect();
        FilterSelection { accepted }
    }

    /// Nothing is accepted in any column.
    pub fn none() -> Self {
        let accepted: BTreeMap<FilterColumn, BTreeSet<String>> = FilterColumn::ALL
            .iter()
            .map(|c| (*c, BTreeSet::new()))
            .collect();
        FilterSelection { accepted }
    }

    pub fn accepted(&self, column: FilterColumn) -> &BTreeSet<String> {
        self.accepted.get(&column).unwrap_or(&NOTHING)
    }

    pub fn set<I, S>(&mut self, column: FilterColumn, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        debug!("selection {} = {:?}", column, values);
        self.accepted.insert(column, values);
    }

    /// Like [`set`](Self::set), with the column given by its header name.
    pub fn set_by_name<I, S>(&mut self, column: &str, values: I) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let column: FilterColumn = column.parse()?;
        self.set(column, values);
        Ok(())
    }

    pub fn toggle(&mut self, column: FilterColumn, value: &str) {
        let selected = self.accepted.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn select_all(&mut self, column: FilterColumn, dataset: &Dataset) {
        self.set(column, dataset.distinct(column).iter().cloned());
    }

    pub fn select_none(&mut self, column: FilterColumn) {
        self.accepted.insert(column, BTreeSet::new());
    }

    pub fn accepts(&self, record: &Record) -> bool {
        FilterColumn::ALL.iter().all(|c| {
            self.accepted
                .get(c)
                .map(|set| set.contains(record.filter_value(*c)))
                .unwrap_or(false)
        })
    }

    /// Selected values that do not occur in the dataset, per column.
    pub fn unmatched<'a>(&'a self, dataset: &Dataset) -> Vec<(FilterColumn, &'a str)> {
        let mut out = Vec::new();
        for (column, values) in &self.accepted {
            let known = dataset.distinct(*column);
            for v in values {
                if !known.iter().any(|k| k == v) {
                    out.push((*column, v.as_str()));
                }
            }
        }
        out
    }
}

/// Rows of a dataset that pass a selection, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn investments(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.investment).collect()
    }
}

impl<'a> FromIterator<&'a Record> for FilteredView<'a> {
    fn from_iter<T: IntoIterator<Item = &'a Record>>(iter: T) -> Self {
        FilteredView {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Keep the rows whose Region, Location and Construction are all accepted.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    for (column, value) in selection.unmatched(dataset) {
        debug!("selected {} '{}' does not occur in the dataset", column, value);
    }
    let view: FilteredView<'a> = dataset
        .records()
        .iter()
        .filter(|r| selection.accepts(r))
        .collect();
    debug!("filter kept {} of {} rows", view.len(), dataset.len());
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::record;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("A", "Urban", "Frame", 100.0),
            record("A", "Rural", "Masonry", 200.0),
            record("B", "Urban", "Frame", 300.0),
        ])
    }

    #[test]
    fn all_selection_is_identity() {
        let ds = sample();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.len(), ds.len());
        for (a, b) in view.rows().iter().zip(ds.records()) {
            assert_eq!(*a, b);
        }
    }

    #[test]
    fn region_filter_keeps_matching_rows_in_order() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::Region, ["A"]);
        let view = filter(&ds, &sel);
        assert_eq!(view.investments(), vec![100.0, 200.0]);
    }

    #[test]
    fn columns_combine_with_and() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::Location, ["Urban"]);
        sel.set(FilterColumn::Construction, ["Frame", "Masonry"]);
        sel.set(FilterColumn::Region, ["B"]);
        let view = filter(&ds, &sel);
        assert_eq!(view.investments(), vec![300.0]);
        for r in view.rows() {
            assert!(sel.accepts(r));
        }
    }

    #[test]
    fn empty_set_in_any_column_empties_the_view() {
        let ds = sample();
        for column in FilterColumn::ALL {
            let mut sel = FilterSelection::all(&ds);
            sel.select_none(column);
            assert!(filter(&ds, &sel).is_empty(), "column {}", column);
        }
        assert!(filter(&ds, &FilterSelection::none()).is_empty());
    }

    #[test]
    fn toggle_and_select_all_round_trip() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle(FilterColumn::Region, "B");
        assert_eq!(filter(&ds, &sel).len(), 2);
        sel.toggle(FilterColumn::Region, "B");
        assert_eq!(filter(&ds, &sel).len(), 3);
        sel.select_none(FilterColumn::Region);
        sel.select_all(FilterColumn::Region, &ds);
        assert_eq!(sel, FilterSelection::all(&ds));
    }

    #[test]
    fn unknown_column_name_is_an_error() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        assert_eq!(
            sel.set_by_name("BusinessType", ["Retail"]),
            Err(FilterError::UnknownColumn("BusinessType".into()))
        );
        assert!(sel.set_by_name("region", ["A"]).is_ok());
        assert_eq!(filter(&ds, &sel).len(), 2);
    }

    #[test]
    fn values_absent_from_dataset_match_nothing() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::Region, ["Z"]);
        assert_eq!(sel.unmatched(&ds), vec![(FilterColumn::Region, "Z")]);
        assert!(filter(&ds, &sel).is_empty());
    }
}
