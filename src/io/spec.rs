use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::core::error::{Error, Result};

/// Ordered category lists for ordinal encoding, one entry per column.
///
/// Loaded from a JSON object mapping column name to an array of category
/// labels; earlier in the array means a lower code. Entry order is the
/// parser's deterministic iteration order (application order does not
/// affect correctness since columns are encoded independently).
#[derive(Debug, Clone, Default)]
pub struct EncoderSpec {
    entries: Vec<(String, Vec<String>)>,
}

impl EncoderSpec {
    /// Build a spec directly from (column, categories) pairs
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Load a spec from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        let json_value: Value = serde_json::from_reader(reader).map_err(Error::Json)?;
        Self::from_json_value(json_value)
    }

    /// Parse a spec out of an already-loaded JSON value
    pub fn from_json_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(Error::InvalidInput(
                    "encoder specification must be a JSON object".to_string(),
                ))
            }
        };

        let mut entries = Vec::with_capacity(map.len());
        for (column, categories) in map {
            let array = match categories {
                Value::Array(array) => array,
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "categories for column '{}' must be a JSON array",
                        column
                    )))
                }
            };

            let mut labels = Vec::with_capacity(array.len());
            for item in array {
                match item {
                    Value::String(s) => labels.push(s),
                    other => {
                        return Err(Error::InvalidInput(format!(
                            "category for column '{}' must be a string, got {}",
                            column, other
                        )))
                    }
                }
            }
            entries.push((column, labels));
        }

        Ok(Self { entries })
    }

    /// The (column, categories) pairs, in application order
    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    /// Number of columns covered by the spec
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the spec is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category list for one column, if present
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, categories)| categories.as_slice())
    }
}
