//! Case Record Model
//! Typed rows of the case table and the immutable dataset holding them.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// One row of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub region: String,
    pub daily_cases: u64,
    pub recovered: u64,
    pub deceased: u64,
}

impl CaseRecord {
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        daily_cases: u64,
        recovered: u64,
        deceased: u64,
    ) -> Self {
        Self {
            date,
            region: region.into(),
            daily_cases,
            recovered,
            deceased,
        }
    }
}

/// Ordered sequence of records in source file order.
///
/// Never mutated once built; sessions share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<CaseRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseRecord> {
        self.records.iter()
    }

    /// Distinct regions, sorted by name.
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest date present, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(
            self.records
                .iter()
                .fold((first, first), |(lo, hi), r| (lo.min(r.date), hi.max(r.date))),
        )
    }
}

impl FromIterator<CaseRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = CaseRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
