//! Filter Engine Module
//! Region and date-range selection over the loaded dataset.

use crate::data::{CaseRecord, Dataset};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// User-chosen subset of the dataset.
///
/// Both date bounds are inclusive. An empty region set or an inverted range
/// selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub selected_regions: BTreeSet<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl FilterCriteria {
    pub fn new(
        selected_regions: impl IntoIterator<Item = impl Into<String>>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            selected_regions: selected_regions.into_iter().map(Into::into).collect(),
            start_date,
            end_date,
        }
    }

    /// Default selection: every region, full date span.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let (start_date, end_date) = dataset
            .date_bounds()
            .unwrap_or((NaiveDate::default(), NaiveDate::default()));

        Self::new(dataset.regions(), start_date, end_date)
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        self.selected_regions.contains(&record.region)
            && self.start_date <= record.date
            && record.date <= self.end_date
    }
}

/// Applies [`FilterCriteria`] to a dataset.
pub struct FilterEngine;

impl FilterEngine {
    /// Records matching `criteria`, in input order.
    pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
        if criteria.selected_regions.is_empty() || criteria.start_date > criteria.end_date {
            return Dataset::default();
        }

        dataset
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect()
    }
}
