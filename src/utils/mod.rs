pub mod constants;
pub mod datetime;
pub mod progress;
pub mod stats;

pub use constants::*;
pub use datetime::parse_flexible_datetime;
pub use progress::ProgressReporter;
