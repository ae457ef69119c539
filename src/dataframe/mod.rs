//! DataFrame module - column-oriented 2D data structure.
//!
//! Columns are uniquely named, equally long, and typed as either numeric
//! (`Float64`) or categorical label (`Str`). Row order is positional and is
//! preserved by every operation: row i of an input corresponds to row i of
//! the output. All transforms return a new DataFrame; callers never observe
//! in-place mutation.

use std::collections::HashMap;

use crate::core::error::{Error, Result};
use crate::na::NA;
use crate::series::Series;

/// A single column: numeric data or categorical labels.
#[derive(Debug, Clone)]
pub enum Column {
    Float64(Series<f64>),
    Str(Series<String>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Float64(s) => s.len(),
            Column::Str(s) => s.len(),
        }
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Float64(_) => "float64",
            Column::Str(_) => "str",
        }
    }

    /// Whether the column holds numeric data
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Float64(_))
    }

    /// Count of missing entries
    pub fn na_count(&self) -> usize {
        match self {
            Column::Float64(s) => s.na_count(),
            Column::Str(s) => s.na_count(),
        }
    }

    /// Boolean mask of missing entries
    pub fn is_na(&self) -> Vec<bool> {
        match self {
            Column::Float64(s) => s.is_na(),
            Column::Str(s) => s.is_na(),
        }
    }

    /// Borrow as a numeric series, if this is one
    pub fn as_float64(&self) -> Option<&Series<f64>> {
        match self {
            Column::Float64(s) => Some(s),
            Column::Str(_) => None,
        }
    }

    /// Borrow as a string series, if this is one
    pub fn as_str(&self) -> Option<&Series<String>> {
        match self {
            Column::Float64(_) => None,
            Column::Str(s) => Some(s),
        }
    }

    /// Render each cell as text; NA becomes the empty string
    pub fn to_display_strings(&self) -> Vec<String> {
        match self {
            Column::Float64(s) => s
                .values()
                .iter()
                .map(|v| match v {
                    NA::Value(x) => format_float(*x),
                    NA::NA => String::new(),
                })
                .collect(),
            Column::Str(s) => s
                .values()
                .iter()
                .map(|v| match v {
                    NA::Value(x) => x.clone(),
                    NA::NA => String::new(),
                })
                .collect(),
        }
    }
}

/// Render a float the way it was most likely written: integral values
/// without a trailing ".0".
pub(crate) fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// DataFrame struct: column-oriented 2D data structure
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: HashMap<String, Column>,
    column_order: Vec<String>,
    row_count: usize,
}

impl DataFrame {
    /// Create a new empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            column_order: Vec::new(),
            row_count: 0,
        }
    }

    /// Get the number of rows in the DataFrame
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns in the DataFrame
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the DataFrame contains a column with the given name
    pub fn contains_column(&self, column_name: &str) -> bool {
        self.columns.contains_key(column_name)
    }

    /// Get column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.column_order.clone()
    }

    /// Add a column to the DataFrame
    pub fn add_column(&mut self, column_name: String, column: Column) -> Result<()> {
        if self.contains_column(&column_name) {
            return Err(Error::DuplicateColumnName(column_name));
        }

        let column_len = column.len();
        if !self.columns.is_empty() && column_len != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column_len,
            });
        }

        if self.columns.is_empty() {
            self.row_count = column_len;
        }

        self.columns.insert(column_name.clone(), column);
        self.column_order.push(column_name);

        Ok(())
    }

    /// Get a column by name
    pub fn column(&self, column_name: &str) -> Result<&Column> {
        self.columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))
    }

    /// Replace an existing column, keeping its position in the column order
    pub fn replace_column(&mut self, column_name: &str, column: Column) -> Result<()> {
        if !self.contains_column(column_name) {
            return Err(Error::ColumnNotFound(column_name.to_string()));
        }
        if column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }
        self.columns.insert(column_name.to_string(), column);
        Ok(())
    }

    /// Create a new DataFrame without the given columns
    ///
    /// Fails with `ColumnNotFound` if any name is unknown; nothing is
    /// dropped in that case.
    pub fn drop_columns<S: AsRef<str>>(&self, column_names: &[S]) -> Result<DataFrame> {
        for name in column_names {
            if !self.contains_column(name.as_ref()) {
                return Err(Error::ColumnNotFound(name.as_ref().to_string()));
            }
        }

        let dropped: std::collections::HashSet<&str> =
            column_names.iter().map(|n| n.as_ref()).collect();

        let mut result = DataFrame::new();
        for name in &self.column_order {
            if !dropped.contains(name.as_str()) {
                result.add_column(name.clone(), self.columns[name].clone())?;
            }
        }
        // An all-column drop must still remember the row count
        if result.columns.is_empty() {
            result.row_count = self.row_count;
        }
        Ok(result)
    }

    /// Create a new DataFrame with only the specified columns, in the given order
    pub fn select_columns<S: AsRef<str>>(&self, column_names: &[S]) -> Result<DataFrame> {
        let mut result = DataFrame::new();
        for name in column_names {
            let column = self.column(name.as_ref())?;
            result.add_column(name.as_ref().to_string(), column.clone())?;
        }
        Ok(result)
    }

    /// Create a new DataFrame holding only the given rows, in the given order
    pub fn take_rows(&self, indices: &[usize]) -> Result<DataFrame> {
        for &i in indices {
            if i >= self.row_count {
                return Err(Error::InvalidInput(format!(
                    "row index {} out of bounds for {} rows",
                    i, self.row_count
                )));
            }
        }

        let mut result = DataFrame::new();
        for name in &self.column_order {
            let taken = match &self.columns[name] {
                Column::Float64(s) => {
                    let values: Vec<NA<f64>> = indices.iter().map(|&i| *s.get(i).unwrap()).collect();
                    Column::Float64(Series::new(values, Some(name.clone())))
                }
                Column::Str(s) => {
                    let values: Vec<NA<String>> =
                        indices.iter().map(|&i| s.get(i).unwrap().clone()).collect();
                    Column::Str(Series::new(values, Some(name.clone())))
                }
            };
            result.add_column(name.clone(), taken)?;
        }
        if result.columns.is_empty() {
            result.row_count = 0;
        }
        Ok(result)
    }

    /// Total number of missing entries across all columns
    pub fn total_na_count(&self) -> usize {
        self.column_order
            .iter()
            .map(|name| self.columns[name].na_count())
            .sum()
    }

    /// Names of the numeric columns, in column order
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.column_order
            .iter()
            .filter(|name| self.columns[*name].is_numeric())
            .cloned()
            .collect()
    }

    /// Extract a numeric column as a plain vector
    ///
    /// Fails with `TypeMismatch` on a string column and `InvalidInput` if
    /// the column still contains missing entries.
    pub fn numeric_values(&self, column_name: &str) -> Result<Vec<f64>> {
        let column = self.column(column_name)?;
        let series = column.as_float64().ok_or(Error::TypeMismatch {
            column: column_name.to_string(),
            expected: "float64",
            found: column.type_name(),
        })?;

        let mut values = Vec::with_capacity(series.len());
        for v in series.values() {
            match v {
                NA::Value(x) => values.push(*x),
                NA::NA => {
                    return Err(Error::InvalidInput(format!(
                        "column '{}' contains missing values",
                        column_name
                    )))
                }
            }
        }
        Ok(values)
    }

    /// Extract the given numeric columns as a row-major matrix
    pub fn numeric_matrix<S: AsRef<str>>(&self, column_names: &[S]) -> Result<Vec<Vec<f64>>> {
        let mut columns = Vec::with_capacity(column_names.len());
        for name in column_names {
            columns.push(self.numeric_values(name.as_ref())?);
        }

        let mut rows = vec![Vec::with_capacity(columns.len()); self.row_count];
        for column in &columns {
            for (row, &value) in rows.iter_mut().zip(column.iter()) {
                row.push(value);
            }
        }
        Ok(rows)
    }

    /// Occurrence count per distinct non-NA value of a string column,
    /// in first-encountered order
    pub fn value_counts(&self, column_name: &str) -> Result<Vec<(String, usize)>> {
        let column = self.column(column_name)?;
        let series = column.as_str().ok_or(Error::TypeMismatch {
            column: column_name.to_string(),
            expected: "str",
            found: column.type_name(),
        })?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for v in series.values() {
            if let NA::Value(label) = v {
                let count = counts.entry(label).or_insert(0);
                if *count == 0 {
                    order.push(label);
                }
                *count += 1;
            }
        }

        Ok(order
            .into_iter()
            .map(|label| (label.to_string(), counts[label]))
            .collect())
    }
}
