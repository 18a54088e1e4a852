//! Data module - CSV loading, record model and filtering

mod filter;
mod loader;
mod model;

pub use filter::{FilterCriteria, FilterEngine};
pub use loader::{DataLoader, DataSourceError};
pub use model::{CaseRecord, Dataset};
