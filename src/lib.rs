pub mod analyzers;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;

pub use analyzers::{
    climate_by_severity, count_by, count_by_pair, filter_options, monthly_counts,
    night_ratio_by_feature, severity_distribution, summary_metrics, trend_summary, Category,
};
pub use dataset::{load_and_clean, Dataset};
pub use error::{ProcessingError, Result};
pub use models::{AccidentRecord, AccidentTable, ClimateVariable, Severity};
pub use processors::RecordFilter;
