//! Aggregation Module
//! Scalar summary, per-date series and per-region breakdown of a filtered dataset.

use crate::data::{CaseRecord, Dataset, FilterCriteria, FilterEngine};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Percentage of `part` in `total`, or 0 when `total` is 0.
///
/// Region rows and the scalar summary share this rule, so no NaN or infinity
/// ever reaches the display.
pub fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Running sums for one group. Sums saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    cases: u64,
    recovered: u64,
    deceased: u64,
}

impl Totals {
    fn add(&mut self, record: &CaseRecord) {
        self.cases = self.cases.saturating_add(record.daily_cases);
        self.recovered = self.recovered.saturating_add(record.recovered);
        self.deceased = self.deceased.saturating_add(record.deceased);
    }
}

/// Totals over the whole filtered subset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryMetrics {
    pub total_cases: u64,
    pub total_recovered: u64,
    pub total_deceased: u64,
    pub recovery_rate: f64,
    pub fatality_rate: f64,
}

impl SummaryMetrics {
    fn from_totals(t: Totals) -> Self {
        Self {
            total_cases: t.cases,
            total_recovered: t.recovered,
            total_deceased: t.deceased,
            recovery_rate: rate(t.recovered, t.cases),
            fatality_rate: rate(t.deceased, t.cases),
        }
    }
}

/// Totals for a single region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummaryRow {
    pub region: String,
    pub total_cases: u64,
    pub total_recovered: u64,
    pub total_deceased: u64,
    pub recovery_rate: f64,
    pub fatality_rate: f64,
}

impl RegionSummaryRow {
    fn new(region: String, t: Totals) -> Self {
        let SummaryMetrics {
            total_cases,
            total_recovered,
            total_deceased,
            recovery_rate,
            fatality_rate,
        } = SummaryMetrics::from_totals(t);

        Self {
            region,
            total_cases,
            total_recovered,
            total_deceased,
            recovery_rate,
            fatality_rate,
        }
    }
}

/// Case total for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub total_cases: u64,
}

/// One point per distinct date, strictly ascending. Missing dates are absent.
pub type DateSeries = Vec<DatePoint>;

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub record_count: usize,
    pub summary: SummaryMetrics,
    pub series: DateSeries,
    pub regions: Vec<RegionSummaryRow>,
}

/// Pure reductions over a dataset.
pub struct Aggregator;

impl Aggregator {
    /// Sum the three counts and derive the two rates.
    pub fn summarize(dataset: &Dataset) -> SummaryMetrics {
        let mut totals = Totals::default();
        for record in dataset {
            totals.add(record);
        }
        SummaryMetrics::from_totals(totals)
    }

    /// Daily case totals, ascending by date.
    pub fn by_date(dataset: &Dataset) -> DateSeries {
        let mut groups: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for record in dataset {
            let total = groups.entry(record.date).or_default();
            *total = total.saturating_add(record.daily_cases);
        }

        groups
            .into_iter()
            .map(|(date, total_cases)| DatePoint { date, total_cases })
            .collect()
    }

    /// One row per region present, sorted by region name.
    pub fn by_region(dataset: &Dataset) -> Vec<RegionSummaryRow> {
        let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
        for record in dataset {
            groups.entry(record.region.as_str()).or_default().add(record);
        }

        groups
            .into_iter()
            .map(|(region, totals)| RegionSummaryRow::new(region.to_string(), totals))
            .collect()
    }

    /// Filter once and compute every dashboard output.
    pub fn dashboard(dataset: &Dataset, criteria: &FilterCriteria) -> DashboardData {
        let filtered = FilterEngine::apply(dataset, criteria);

        DashboardData {
            record_count: filtered.len(),
            summary: Self::summarize(&filtered),
            series: Self::by_date(&filtered),
            regions: Self::by_region(&filtered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            CaseRecord::new(date(2021, 1, 1), "A", 10, 5, 1),
            CaseRecord::new(date(2021, 1, 1), "B", 20, 10, 2),
            CaseRecord::new(date(2021, 1, 2), "A", 5, 5, 0),
        ])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn full_selection_scenario() {
        let criteria = FilterCriteria::new(["A", "B"], date(2021, 1, 1), date(2021, 1, 2));

        let data = Aggregator::dashboard(&sample(), &criteria);

        assert_eq!(data.record_count, 3);
        assert_eq!(data.summary.total_cases, 35);
        assert_eq!(data.summary.total_recovered, 20);
        assert_eq!(data.summary.total_deceased, 3);
        assert_close(data.summary.recovery_rate, 57.14);
        assert_close(data.summary.fatality_rate, 8.57);
        assert_eq!(
            data.series,
            vec![
                DatePoint { date: date(2021, 1, 1), total_cases: 30 },
                DatePoint { date: date(2021, 1, 2), total_cases: 5 },
            ]
        );

        let a = &data.regions[0];
        assert_eq!(a.region, "A");
        assert_eq!((a.total_cases, a.total_recovered, a.total_deceased), (15, 10, 1));
        assert_close(a.recovery_rate, 66.67);
        assert_close(a.fatality_rate, 6.67);
        assert_eq!(data.regions[1].region, "B");
    }

    #[test]
    fn region_restriction_scenario() {
        let criteria = FilterCriteria::new(["A"], date(2021, 1, 1), date(2021, 1, 2));

        let data = Aggregator::dashboard(&sample(), &criteria);

        assert_eq!(data.summary.total_cases, 15);
        assert_eq!(data.regions.len(), 1);
        assert!(data.regions.iter().all(|row| row.region != "B"));
    }

    #[test]
    fn empty_selection_yields_zeroes() {
        let criteria = FilterCriteria::new(Vec::<String>::new(), date(2021, 1, 1), date(2021, 1, 2));

        let data = Aggregator::dashboard(&sample(), &criteria);

        assert_eq!(data, DashboardData::default());
        assert_eq!(data.summary.recovery_rate, 0.0);
        assert_eq!(data.summary.fatality_rate, 0.0);
    }

    #[test]
    fn zero_case_region_has_zero_rates() {
        let dataset = Dataset::new(vec![CaseRecord::new(date(2021, 1, 1), "Anomali", 0, 3, 1)]);

        let rows = Aggregator::by_region(&dataset);

        assert_eq!(rows[0].total_recovered, 3);
        assert_eq!(rows[0].recovery_rate, 0.0);
        assert_eq!(rows[0].fatality_rate, 0.0);
    }

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(5, 0, 0.0)]
    #[case(0, 10, 0.0)]
    #[case(1, 4, 25.0)]
    #[case(4, 4, 100.0)]
    fn rate_guards_zero_total(#[case] part: u64, #[case] total: u64, #[case] expected: f64) {
        assert_eq!(rate(part, total), expected);
    }

    #[test]
    fn series_fills_no_gaps() {
        let dataset = Dataset::new(vec![
            CaseRecord::new(date(2021, 1, 5), "A", 2, 0, 0),
            CaseRecord::new(date(2021, 1, 1), "A", 1, 0, 0),
        ]);

        let dates: Vec<_> = Aggregator::by_date(&dataset).iter().map(|p| p.date).collect();

        assert_eq!(dates, vec![date(2021, 1, 1), date(2021, 1, 5)]);
    }

    #[test]
    fn huge_totals_saturate() {
        let dataset = Dataset::new(vec![
            CaseRecord::new(date(2021, 1, 1), "A", u64::MAX, u64::MAX, 1),
            CaseRecord::new(date(2021, 1, 1), "A", 7, 1, 1),
        ]);

        let summary = Aggregator::summarize(&dataset);
        let rows = Aggregator::by_region(&dataset);
        let series = Aggregator::by_date(&dataset);

        assert_eq!(summary.total_cases, u64::MAX);
        assert_eq!(summary.total_recovered, u64::MAX);
        assert_eq!(summary.total_deceased, 2);
        assert_eq!(rows[0].total_cases, u64::MAX);
        assert_eq!(series[0].total_cases, u64::MAX);
        assert!(summary.recovery_rate.is_finite());
    }

    prop_compose! {
        fn dataset_strategy()(
            rows in prop::collection::vec(
                (0u32..28, prop::sample::select(vec!["A", "B", "C"]), 0u64..10_000, 0u64..10_000, 0u64..1_000),
                0..80,
            )
        ) -> Dataset {
            rows.into_iter()
                .map(|(day, region, cases, recovered, deceased)| {
                    CaseRecord::new(date(2021, 2, 1 + day), region, cases, recovered, deceased)
                })
                .collect()
        }
    }

    proptest! {
        #[test]
        fn prop_grouped_sums_reconcile(dataset in dataset_strategy()) {
            let summary = Aggregator::summarize(&dataset);
            let rows = Aggregator::by_region(&dataset);
            let series = Aggregator::by_date(&dataset);

            prop_assert_eq!(summary.total_cases, rows.iter().map(|r| r.total_cases).sum::<u64>());
            prop_assert_eq!(summary.total_recovered, rows.iter().map(|r| r.total_recovered).sum::<u64>());
            prop_assert_eq!(summary.total_deceased, rows.iter().map(|r| r.total_deceased).sum::<u64>());
            prop_assert_eq!(summary.total_cases, series.iter().map(|p| p.total_cases).sum::<u64>());
        }

        #[test]
        fn prop_series_dates_strictly_increase(dataset in dataset_strategy()) {
            let series = Aggregator::by_date(&dataset);

            prop_assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        }

        #[test]
        fn prop_rates_are_finite(dataset in dataset_strategy()) {
            let summary = Aggregator::summarize(&dataset);
            prop_assert!(summary.recovery_rate.is_finite() && summary.fatality_rate.is_finite());
            for row in Aggregator::by_region(&dataset) {
                prop_assert!(row.recovery_rate.is_finite() && row.fatality_rate.is_finite());
            }
        }
    }
}
