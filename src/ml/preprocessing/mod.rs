//! Data preprocessing: missing-value filling and categorical encoding.
//!
//! Every function here is pure with respect to its input: it receives a
//! `&DataFrame` and returns a new one, failing fast on the first violated
//! precondition without partially applying the stage.

use std::collections::HashMap;

use crate::core::error::{Error, Result};
use crate::dataframe::{Column, DataFrame};
use crate::io::EncoderSpec;
use crate::na::NA;
use crate::series::Series;

/// Fill missing entries of the named columns with a caller-supplied value.
///
/// Columns not listed are left untouched. Unknown names fail with
/// `ColumnNotFound` before anything is filled. A numeric column accepts the
/// value only if it parses as a number.
pub fn fill_na_values<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
    value: &str,
) -> Result<DataFrame> {
    for name in columns {
        if !df.contains_column(name.as_ref()) {
            return Err(Error::ColumnNotFound(name.as_ref().to_string()));
        }
    }

    let mut filled = df.clone();
    for name in columns {
        let name = name.as_ref();
        let column = match filled.column(name)? {
            Column::Str(series) => Column::Str(series.fillna(value.to_string())),
            Column::Float64(series) => {
                let numeric: f64 = value.parse().map_err(|_| Error::TypeMismatch {
                    column: name.to_string(),
                    expected: "float64",
                    found: "str",
                })?;
                Column::Float64(series.fillna(numeric))
            }
        };
        filled.replace_column(name, column)?;
    }
    Ok(filled)
}

/// Fill every remaining missing entry by a per-column rule: the arithmetic
/// mean for numeric columns, the most frequent value for categorical ones.
///
/// Statistics are computed over the non-missing entries of this dataset
/// only. A column with no non-missing entries has no mean or mode and fails
/// with `EmptyData` naming the column.
pub fn fill_all_na_values(df: &DataFrame) -> Result<DataFrame> {
    let mut filled = df.clone();
    for name in df.column_names() {
        let column = filled.column(&name)?;
        if column.na_count() == 0 {
            continue;
        }

        let replacement = match column {
            Column::Float64(series) => Column::Float64(series.fillna(series.mean()?)),
            Column::Str(series) => {
                let mode = series.mode().ok_or_else(|| {
                    Error::EmptyData(format!(
                        "cannot compute the mode of '{}': no non-missing values",
                        name
                    ))
                })?;
                Column::Str(series.fillna(mode))
            }
        };
        filled.replace_column(&name, replacement)?;
    }
    Ok(filled)
}

/// Ordinal encoder with an externally supplied category order.
///
/// Each label maps to its zero-based index in the supplied list; earlier in
/// the list means a lower code.
#[derive(Debug, Clone)]
pub struct OrdinalEncoder {
    categories: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl OrdinalEncoder {
    /// Create an encoder from an ordered category list
    pub fn new(categories: Vec<String>) -> Self {
        let mapping = categories
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();
        Self {
            categories,
            mapping,
        }
    }

    /// The ordered category list
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Replace the column's labels with their ordinal codes.
    ///
    /// A label absent from the category list fails with `UnknownCategory`.
    /// Missing entries stay missing.
    pub fn transform(&self, df: &DataFrame, column_name: &str) -> Result<DataFrame> {
        let column = df.column(column_name)?;
        let series = column.as_str().ok_or(Error::TypeMismatch {
            column: column_name.to_string(),
            expected: "str",
            found: column.type_name(),
        })?;

        let mut codes = Vec::with_capacity(series.len());
        for v in series.values() {
            match v {
                NA::Value(label) => {
                    let code = self.mapping.get(label).ok_or_else(|| Error::UnknownCategory {
                        column: column_name.to_string(),
                        value: label.clone(),
                    })?;
                    codes.push(NA::Value(*code as f64));
                }
                NA::NA => codes.push(NA::NA),
            }
        }

        let mut encoded = df.clone();
        encoded.replace_column(
            column_name,
            Column::Float64(Series::new(codes, Some(column_name.to_string()))),
        )?;
        Ok(encoded)
    }
}

/// Apply ordinal encoding for every entry of an encoder specification.
///
/// Entries are applied in the spec's order; columns are independent, so the
/// order does not affect the result. A spec entry naming a column absent
/// from the data fails with `MissingColumn`.
pub fn encode_from_spec(df: &DataFrame, spec: &EncoderSpec) -> Result<DataFrame> {
    for (column, _) in spec.entries() {
        if !df.contains_column(column) {
            return Err(Error::MissingColumn(column.clone()));
        }
    }

    let mut encoded = df.clone();
    for (column, categories) in spec.entries() {
        let encoder = OrdinalEncoder::new(categories.clone());
        encoded = encoder.transform(&encoded, column)?;
    }
    Ok(encoded)
}

/// Label encoder with a learned category→code mapping.
///
/// The mapping is learned once from one dataset and can then be applied to
/// any number of datasets, so the same label always receives the same code.
/// Codes follow first-encountered order at fit time.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the label→code mapping from one column
    pub fn fit(&mut self, df: &DataFrame, column_name: &str) -> Result<()> {
        let column = df.column(column_name)?;
        let series = column.as_str().ok_or(Error::TypeMismatch {
            column: column_name.to_string(),
            expected: "str",
            found: column.type_name(),
        })?;

        let mut classes = Vec::new();
        let mut mapping = HashMap::new();
        for v in series.values() {
            if let NA::Value(label) = v {
                if !mapping.contains_key(label) {
                    mapping.insert(label.clone(), classes.len());
                    classes.push(label.clone());
                }
            }
        }

        if classes.is_empty() {
            return Err(Error::EmptyData(format!(
                "cannot fit a label encoder on '{}': no non-missing values",
                column_name
            )));
        }

        self.classes = classes;
        self.mapping = mapping;
        Ok(())
    }

    /// The labels seen at fit time, in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Replace the column's labels with their learned codes.
    ///
    /// Fails with `NotFitted` before `fit`, and with `UnknownCategory` for
    /// labels not seen at fit time.
    pub fn transform(&self, df: &DataFrame, column_name: &str) -> Result<DataFrame> {
        if self.classes.is_empty() {
            return Err(Error::NotFitted("LabelEncoder".to_string()));
        }

        let column = df.column(column_name)?;
        let series = column.as_str().ok_or(Error::TypeMismatch {
            column: column_name.to_string(),
            expected: "str",
            found: column.type_name(),
        })?;

        let mut codes = Vec::with_capacity(series.len());
        for v in series.values() {
            match v {
                NA::Value(label) => {
                    let code = self.mapping.get(label).ok_or_else(|| Error::UnknownCategory {
                        column: column_name.to_string(),
                        value: label.clone(),
                    })?;
                    codes.push(NA::Value(*code as f64));
                }
                NA::NA => codes.push(NA::NA),
            }
        }

        let mut encoded = df.clone();
        encoded.replace_column(
            column_name,
            Column::Float64(Series::new(codes, Some(column_name.to_string()))),
        )?;
        Ok(encoded)
    }

    /// Fit on a column and transform it in one step
    pub fn fit_transform(&mut self, df: &DataFrame, column_name: &str) -> Result<DataFrame> {
        self.fit(df, column_name)?;
        self.transform(df, column_name)
    }
}
