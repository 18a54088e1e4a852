//! Stats module - summary metrics and grouped reductions

mod aggregator;

pub use aggregator::{
    Aggregator, DashboardData, DatePoint, DateSeries, RegionSummaryRow, SummaryMetrics,
};
