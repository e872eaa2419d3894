pub mod accident_reader;
pub mod sampler;

pub use accident_reader::{AccidentReader, LoadOptions};
pub use sampler::{sample_indices, sample_records};
