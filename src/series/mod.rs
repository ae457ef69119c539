//! Series module - a single named column of values that may be missing.
//!
//! Every cell is an [`NA<T>`], so missing data is explicit in the type.
//! Numeric series additionally offer NA-skipping aggregates, and any
//! hashable series can compute its mode.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::Sum;

use crate::core::error::{Error, Result};
use crate::na::NA;

/// Series structure supporting missing values
#[derive(Debug, Clone)]
pub struct Series<T>
where
    T: Debug + Clone,
{
    /// Series data values (wrapped in NA type)
    values: Vec<NA<T>>,
    /// Name (optional)
    name: Option<String>,
}

impl<T> Series<T>
where
    T: Debug + Clone,
{
    /// Create a new Series from a vector of NA values
    pub fn new(values: Vec<NA<T>>, name: Option<String>) -> Self {
        Series { values, name }
    }

    /// Create from a regular vector (no missing entries)
    pub fn from_vec(values: Vec<T>, name: Option<String>) -> Self {
        let na_values = values.into_iter().map(NA::Value).collect();
        Self::new(na_values, name)
    }

    /// Create from a vector of Options (None becomes NA)
    pub fn from_options(values: Vec<Option<T>>, name: Option<String>) -> Self {
        let na_values = values.into_iter().map(NA::from).collect();
        Self::new(na_values, name)
    }

    /// Get the length of the Series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the Series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get value by position
    pub fn get(&self, pos: usize) -> Option<&NA<T>> {
        self.values.get(pos)
    }

    /// Get the array of values
    pub fn values(&self) -> &[NA<T>] {
        &self.values
    }

    /// Get the name
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the name and return self (builder pattern)
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Get the count of NA values
    pub fn na_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_na()).count()
    }

    /// Check if there are any NA values
    pub fn has_na(&self) -> bool {
        self.values.iter().any(|v| v.is_na())
    }

    /// Get a boolean array indicating which elements are NA
    pub fn is_na(&self) -> Vec<bool> {
        self.values.iter().map(|v| v.is_na()).collect()
    }

    /// Fill NA values with a specified value
    pub fn fillna(&self, fill_value: T) -> Self {
        let filled_values: Vec<NA<T>> = self
            .values
            .iter()
            .map(|v| match v {
                NA::Value(_) => v.clone(),
                NA::NA => NA::Value(fill_value.clone()),
            })
            .collect();

        Self::new(filled_values, self.name.clone())
    }

    /// Collect the non-NA values into a plain vector
    pub fn dropna_values(&self) -> Vec<T> {
        self.values
            .iter()
            .filter_map(|v| v.value().cloned())
            .collect()
    }
}

impl<T> Series<T>
where
    T: Debug + Clone + Eq + Hash,
{
    /// Most frequent non-NA value; ties broken by first-encountered order.
    ///
    /// Returns `None` when every entry is NA.
    pub fn mode(&self) -> Option<T> {
        let mut counts: HashMap<&T, usize> = HashMap::new();
        let mut order: Vec<&T> = Vec::new();

        for v in &self.values {
            if let NA::Value(val) = v {
                let count = counts.entry(val).or_insert(0);
                if *count == 0 {
                    order.push(val);
                }
                *count += 1;
            }
        }

        // Strictly-greater comparison keeps the first-encountered value on ties
        let mut best: Option<(&T, usize)> = None;
        for &v in &order {
            let count = counts[v];
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((v, count));
            }
        }
        best.map(|(v, _)| v.clone())
    }
}

// Specialized implementation for numeric Series
impl<T> Series<T>
where
    T: Debug + Clone + Copy + Sum<T> + num_traits::NumCast + std::ops::Div<Output = T>,
{
    /// Calculate the sum (ignoring NA)
    pub fn sum(&self) -> NA<T> {
        let values: Vec<T> = self
            .values
            .iter()
            .filter_map(|v| v.value().copied())
            .collect();

        if values.is_empty() {
            NA::NA
        } else {
            NA::Value(values.into_iter().sum())
        }
    }

    /// Calculate the mean (ignoring NA)
    pub fn mean(&self) -> Result<T> {
        let values: Vec<T> = self
            .values
            .iter()
            .filter_map(|v| v.value().copied())
            .collect();

        if values.is_empty() {
            return Err(Error::EmptyData(format!(
                "cannot compute the mean of '{}': no non-missing values",
                self.name.as_deref().unwrap_or("<unnamed>")
            )));
        }

        let count = values.len();
        let sum: T = values.into_iter().sum();
        let count: T = num_traits::cast(count).ok_or_else(|| {
            Error::InvalidInput("cannot cast length to the numeric element type".to_string())
        })?;

        Ok(sum / count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_len_and_na_count() {
        let s = Series::new(
            vec![NA::Value(1.0), NA::NA, NA::Value(3.0)],
            Some("x".to_string()),
        );
        assert_eq!(s.len(), 3);
        assert_eq!(s.na_count(), 1);
        assert!(s.has_na());
        assert_eq!(s.is_na(), vec![false, true, false]);
    }

    #[test]
    fn test_series_fillna() {
        let s = Series::new(vec![NA::Value(1.0), NA::NA, NA::Value(3.0)], None);
        let filled = s.fillna(2.0);
        assert!(!filled.has_na());
        assert_eq!(filled.get(1), Some(&NA::Value(2.0)));
    }

    #[test]
    fn test_series_mean_skips_na() {
        let s = Series::new(
            vec![NA::Value(1.0f64), NA::NA, NA::Value(3.0)],
            Some("num".to_string()),
        );
        assert!((s.mean().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_series_sum_skips_na() {
        let s = Series::new(vec![NA::Value(1.0f64), NA::NA, NA::Value(3.0)], None);
        assert_eq!(s.sum(), NA::Value(4.0));

        let empty: Series<f64> = Series::new(vec![NA::NA], None);
        assert_eq!(empty.sum(), NA::NA);
    }

    #[test]
    fn test_series_mean_all_na_fails() {
        let s: Series<f64> = Series::new(vec![NA::NA, NA::NA], Some("empty".to_string()));
        assert!(s.mean().is_err());
    }

    #[test]
    fn test_series_mode_first_encountered_tie_break() {
        let s = Series::new(
            vec![
                NA::Value("B".to_string()),
                NA::Value("A".to_string()),
                NA::Value("A".to_string()),
                NA::Value("B".to_string()),
                NA::NA,
            ],
            None,
        );
        // B and A both occur twice; B was seen first
        assert_eq!(s.mode(), Some("B".to_string()));
    }

    #[test]
    fn test_series_mode_all_na() {
        let s: Series<String> = Series::new(vec![NA::NA, NA::NA], None);
        assert_eq!(s.mode(), None);
    }

    #[test]
    fn test_series_from_options() {
        let s = Series::from_options(vec![Some(1i64), None, Some(3)], None);
        assert_eq!(s.na_count(), 1);
        assert_eq!(s.dropna_values(), vec![1, 3]);
    }
}
