//! Core module with the crate-wide error type.

pub mod error;

pub use error::{Error, Result};
