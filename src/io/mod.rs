//! Input/output for tabular data and collaborator files.

pub mod csv;
pub mod spec;

pub use csv::{read_csv, write_csv, write_submission};
pub use spec::EncoderSpec;
