pub mod cleaner;
pub mod filter;

pub use cleaner::{CleanOptions, CleanReport, Cleaner, ClimateFill};
pub use filter::RecordFilter;
