use crate::types::{FilterColumn, Record};
use std::collections::{BTreeMap, HashSet};

/// The loaded policy table. Built once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Distinct values per filter column, in first-appearance order.
    distinct: BTreeMap<FilterColumn, Vec<String>>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut distinct = BTreeMap::new();
        for column in FilterColumn::ALL {
            let mut seen: HashSet<&str> = HashSet::new();
            let values: Vec<String> = records
                .iter()
                .map(|r| r.filter_value(column))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();
            distinct.insert(column, values);
        }
        Dataset { records, distinct }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn distinct(&self, column: FilterColumn) -> &[String] {
        self.distinct
            .get(&column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::Record;

    pub fn record(region: &str, location: &str, construction: &str, investment: f64) -> Record {
        Record {
            policy: format!("P-{}", investment),
            expiry: None,
            location: location.to_string(),
            state: "Nairobi".to_string(),
            region: region.to_string(),
            investment,
            construction: construction.to_string(),
            business_type: "Retail".to_string(),
            earthquake: "No".to_string(),
            flood: "No".to_string(),
            rating: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn distinct_values_keep_first_appearance_order() {
        let ds = Dataset::from_records(vec![
            record("West", "Urban", "Frame", 1.0),
            record("East", "Rural", "Frame", 2.0),
            record("West", "Urban", "Masonry", 3.0),
        ]);
        assert_eq!(ds.distinct(FilterColumn::Region), ["West", "East"]);
        assert_eq!(ds.distinct(FilterColumn::Location), ["Urban", "Rural"]);
        assert_eq!(ds.distinct(FilterColumn::Construction), ["Frame", "Masonry"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_dataset_has_no_distinct_values() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.distinct(FilterColumn::Region).is_empty());
    }
}
