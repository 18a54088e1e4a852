//! CSV Data Loader Module
//! Reads the case table with Polars and normalizes it into typed records.

use crate::data::{CaseRecord, Dataset};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

pub const DATE_COLUMN: &str = "tanggal";
pub const REGION_COLUMN: &str = "provinsi";
pub const CASES_COLUMN: &str = "kasus_harian";
pub const RECOVERED_COLUMN: &str = "sembuh";
pub const DECEASED_COLUMN: &str = "meninggal";

/// Date layouts accepted in the date column, tried in order on the first value.
/// Ambiguous day/month values read month-first.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Unrecognized date format: '{0}'")]
    UnknownDateFormat(String),
    #[error("Row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Row {row}: empty region")]
    EmptyRegion { row: usize },
    #[error("Row {row}: invalid value '{value}' in column '{column}'")]
    InvalidCount {
        row: usize,
        column: String,
        value: String,
    },
}

/// Loads the case table once per session.
///
/// The first successful [`DataLoader::load`] stores the dataset; later calls
/// hand out the same snapshot without touching storage. Failed loads are not
/// remembered.
pub struct DataLoader {
    path: PathBuf,
    snapshot: OnceLock<Arc<Dataset>>,
}

impl DataLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: OnceLock::new(),
        }
    }

    /// Get the source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the loaded dataset, if any.
    pub fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.snapshot.get().cloned()
    }

    /// Load the dataset, reading the file only on the first successful call.
    pub fn load(&self) -> Result<Arc<Dataset>, DataSourceError> {
        if let Some(dataset) = self.snapshot.get() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(read_dataset(&self.path)?);
        Ok(Arc::clone(self.snapshot.get_or_init(|| dataset)))
    }
}

/// Read and normalize a case CSV file.
pub fn read_dataset(path: &Path) -> Result<Dataset, DataSourceError> {
    if !path.is_file() {
        return Err(DataSourceError::NotFound(path.to_path_buf()));
    }

    log::info!("Loading case data from {}", path.display());

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    let dataset = dataset_from_frame(&df)
        .inspect_err(|e| log::warn!("Rejected {}: {e}", path.display()))?;

    log::info!(
        "Loaded {} rows across {} regions",
        dataset.len(),
        dataset.regions().len()
    );

    Ok(dataset)
}

/// Convert a raw frame into typed records, validating every row.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset, DataSourceError> {
    let dates = parse_dates(required_column(df, DATE_COLUMN)?)?;
    let regions = parse_regions(required_column(df, REGION_COLUMN)?)?;
    let cases = parse_counts(required_column(df, CASES_COLUMN)?, CASES_COLUMN)?;
    let recovered = parse_counts(required_column(df, RECOVERED_COLUMN)?, RECOVERED_COLUMN)?;
    let deceased = parse_counts(required_column(df, DECEASED_COLUMN)?, DECEASED_COLUMN)?;

    let records = dates
        .into_iter()
        .zip(regions)
        .zip(cases)
        .zip(recovered)
        .zip(deceased)
        .map(|((((date, region), cases), recovered), deceased)| {
            CaseRecord::new(date, region, cases, recovered, deceased)
        })
        .collect();

    Ok(records)
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DataSourceError> {
    df.column(name)
        .map_err(|_| DataSourceError::MissingColumn(name.to_string()))
}

/// Pick the first known layout that parses `sample`.
fn infer_date_format(sample: &str) -> Option<&'static str> {
    DATE_FORMATS
        .into_iter()
        .find(|fmt| parse_date(sample, fmt).is_some())
}

/// Parse the date part of `value`, ignoring any time suffix.
fn parse_date(value: &str, fmt: &str) -> Option<NaiveDate> {
    let date_part = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, fmt).ok()
}

fn parse_dates(column: &Column) -> Result<Vec<NaiveDate>, DataSourceError> {
    let text = column.cast(&DataType::String)?;
    let text = text.str()?;
    let mut format: Option<&'static str> = None;

    text.into_iter()
        .enumerate()
        .map(|(i, value)| {
            let row = i + 1;
            let raw = value.map(str::trim).unwrap_or_default();
            if raw.is_empty() {
                return Err(DataSourceError::InvalidDate {
                    row,
                    value: String::new(),
                });
            }

            let fmt = match format {
                Some(fmt) => fmt,
                None => {
                    let fmt = infer_date_format(raw)
                        .ok_or_else(|| DataSourceError::UnknownDateFormat(raw.to_string()))?;
                    log::debug!("Inferred date format {fmt} from '{raw}'");
                    *format.insert(fmt)
                }
            };

            parse_date(raw, fmt).ok_or_else(|| DataSourceError::InvalidDate {
                row,
                value: raw.to_string(),
            })
        })
        .collect()
}

fn parse_regions(column: &Column) -> Result<Vec<String>, DataSourceError> {
    let text = column.cast(&DataType::String)?;
    let text = text.str()?;

    text.into_iter()
        .enumerate()
        .map(|(i, value)| match value.map(str::trim) {
            Some(region) if !region.is_empty() => Ok(region.to_string()),
            _ => Err(DataSourceError::EmptyRegion { row: i + 1 }),
        })
        .collect()
}

fn parse_counts(column: &Column, name: &str) -> Result<Vec<u64>, DataSourceError> {
    let text = column.cast(&DataType::String)?;
    let text = text.str()?;
    let numbers = if column.dtype().is_integer() {
        integer_counts(column)?
    } else {
        float_counts(column)?
    };

    numbers
        .into_iter()
        .zip(text.into_iter())
        .enumerate()
        .map(|(i, (number, raw))| {
            number.ok_or_else(|| DataSourceError::InvalidCount {
                row: i + 1,
                column: name.to_string(),
                value: raw.unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Exact path for integer columns. Negative values cast to null.
fn integer_counts(column: &Column) -> PolarsResult<Vec<Option<u64>>> {
    let numbers = column.cast(&DataType::UInt64)?;
    let counts = numbers.u64()?.into_iter().collect();
    Ok(counts)
}

/// Float columns such as `10.0` must hold whole values within `u64`.
fn float_counts(column: &Column) -> PolarsResult<Vec<Option<u64>>> {
    let numbers = column.cast(&DataType::Float64)?;
    let counts = numbers
        .f64()?
        .into_iter()
        .map(|number| {
            number
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v < u64::MAX as f64)
                .map(|v| v as u64)
        })
        .collect();
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "tanggal,provinsi,kasus_harian,sembuh,meninggal";

    fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("data_covid.csv");
        fs::write(&path, body).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn loads_and_normalizes_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!(
                "{HEADER}\n2021-01-01,DKI Jakarta,10,5,1\n2021-01-02, Bali ,3,2,0\n"
            ),
        );

        let dataset = DataLoader::new(&path).load().unwrap();

        assert_eq!(
            dataset.records(),
            &[
                CaseRecord::new(date(2021, 1, 1), "DKI Jakarta", 10, 5, 1),
                CaseRecord::new(date(2021, 1, 2), "Bali", 3, 2, 0),
            ]
        );
    }

    #[test]
    fn numeric_regions_become_text() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{HEADER}\n2021-01-01,31,4,1,0\n2021-01-01,32,2,0,0\n"));

        let dataset = read_dataset(&path).unwrap();

        assert_eq!(dataset.regions(), vec!["31", "32"]);
    }

    #[test]
    fn extra_columns_and_float_counts_are_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "kode,tanggal,provinsi,kasus_harian,sembuh,meninggal\nx,2021-01-01,Aceh,10.0,5.0,1.0\n",
        );

        let dataset = read_dataset(&path).unwrap();

        assert_eq!(dataset.records()[0], CaseRecord::new(date(2021, 1, 1), "Aceh", 10, 5, 1));
    }

    #[rstest]
    #[case("2021-03-04", date(2021, 3, 4))]
    #[case("2021/03/04", date(2021, 3, 4))]
    #[case("12/31/2021", date(2021, 12, 31))]
    #[case("01/02/2021", date(2021, 1, 2))]
    #[case("04-03-2021", date(2021, 4, 3))]
    #[case("31/12/2021", date(2021, 12, 31))]
    #[case("13-01-2021", date(2021, 1, 13))]
    #[case("2021-03-04 00:00:00", date(2021, 3, 4))]
    #[case("2021-03-04T12:30:00", date(2021, 3, 4))]
    fn infers_date_layout(#[case] raw: &str, #[case] expected: NaiveDate) {
        let fmt = infer_date_format(raw).unwrap();
        assert_eq!(parse_date(raw, fmt), Some(expected));
    }

    #[test]
    fn date_layout_is_fixed_by_first_row() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{HEADER}\n2021-01-01,A,1,0,0\n02/01/2021,A,1,0,0\n"),
        );

        let err = read_dataset(&path).unwrap_err();

        assert!(matches!(
            err,
            DataSourceError::InvalidDate { row: 2, ref value } if value == "02/01/2021"
        ));
    }

    #[test]
    fn ambiguous_first_date_reads_month_first() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{HEADER}\n01/02/2021,A,1,0,0\n01/13/2021,A,1,0,0\n"),
        );

        let dataset = read_dataset(&path).unwrap();

        let dates: Vec<_> = dataset.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2021, 1, 2), date(2021, 1, 13)]);
    }

    #[test]
    fn unknown_date_layout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{HEADER}\nyesterday,A,1,0,0\n"));

        let err = read_dataset(&path).unwrap_err();

        assert!(matches!(err, DataSourceError::UnknownDateFormat(ref v) if v == "yesterday"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");

        let err = DataLoader::new(&path).load().unwrap_err();

        assert!(matches!(err, DataSourceError::NotFound(ref p) if p == &path));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "tanggal,provinsi,kasus_harian,sembuh\n2021-01-01,A,1,0\n");

        let err = read_dataset(&path).unwrap_err();

        assert!(matches!(err, DataSourceError::MissingColumn(ref c) if c == DECEASED_COLUMN));
    }

    #[test]
    fn large_integer_counts_load_exactly() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{HEADER}\n2021-01-01,A,9007199254740993,0,0\n"),
        );

        let dataset = read_dataset(&path).unwrap();

        assert_eq!(dataset.records()[0].daily_cases, 9_007_199_254_740_993);
    }

    #[test]
    fn count_beyond_u64_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{HEADER}\n2021-01-01,A,1,0,0\n2021-01-02,A,1e20,0,0\n"),
        );

        let err = read_dataset(&path).unwrap_err();

        assert!(matches!(
            err,
            DataSourceError::InvalidCount { row: 2, ref column, .. } if column == CASES_COLUMN
        ));
    }

    #[rstest]
    #[case("-3")]
    #[case("2.5")]
    #[case("banyak")]
    fn invalid_counts_are_rejected(#[case] cases: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{HEADER}\n2021-01-01,A,1,0,0\n2021-01-02,A,{cases},0,0\n"),
        );

        let err = read_dataset(&path).unwrap_err();

        assert!(matches!(
            err,
            DataSourceError::InvalidCount { row: 2, ref column, ref value }
                if column == CASES_COLUMN && value == cases
        ));
    }

    #[test]
    fn empty_region_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{HEADER}\n2021-01-01,A,1,0,0\n2021-01-02,\"  \",1,0,0\n"));

        let err = read_dataset(&path).unwrap_err();

        assert!(matches!(err, DataSourceError::EmptyRegion { row: 2 }));
    }

    #[test]
    fn load_reads_storage_once() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{HEADER}\n2021-01-01,A,1,0,0\n"));
        let loader = DataLoader::new(&path);

        let first = loader.load().unwrap();
        fs::remove_file(&path).unwrap();
        let second = loader.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &loader.snapshot().unwrap()));
    }

    #[test]
    fn separate_loads_of_unchanged_file_are_equal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{HEADER}\n2021-01-01,A,1,0,0\n2021-01-02,B,2,1,0\n"));

        let a = DataLoader::new(&path).load().unwrap();
        let b = DataLoader::new(&path).load().unwrap();

        assert_eq!(*a, *b);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.csv");
        let loader = DataLoader::new(&path);

        assert!(loader.load().is_err());
        fs::write(&path, format!("{HEADER}\n2021-01-01,A,1,0,0\n")).unwrap();

        assert_eq!(loader.load().unwrap().len(), 1);
    }
}
