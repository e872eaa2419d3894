pub mod accident;
pub mod infrastructure;
pub mod raw;
pub mod table;

pub use accident::{AccidentRecord, ClimateVariable, DayPhase, Severity, YearMonth};
pub use infrastructure::{InfrastructureFeature, InfrastructureFlags};
pub use raw::{RawRecord, RawTable, Schema};
pub use table::AccidentTable;
