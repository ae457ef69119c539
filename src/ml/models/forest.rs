//! Random-forest regression
//!
//! An ensemble of variance-reduction decision trees fitted on bootstrap
//! samples; predictions are the average over the trees. Deterministic when
//! a random seed is supplied.

use std::collections::HashMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::ml::metrics::regression::{
    mean_absolute_error, mean_squared_error, r2_score, root_mean_squared_error,
};
use crate::ml::models::{ModelEvaluator, ModelMetrics, SupervisedModel};

/// One node of a fitted regression tree
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

/// Random forest regressor
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Maximum depth of the trees (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum number of samples required to split a node
    pub min_samples_split: usize,
    /// Number of features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for reproducibility
    pub random_seed: Option<u64>,
    /// Fitted trees
    trees: Vec<TreeNode>,
    /// Feature names seen at fit time, in matrix order
    feature_names: Option<Vec<String>>,
    /// Accumulated impurity decrease per feature
    importance_sums: HashMap<String, f64>,
    /// Wall-clock seconds spent in the last fit
    training_time: f64,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomForestRegressor {
    /// Create a new RandomForestRegressor with default hyperparameters
    pub fn new() -> Self {
        RandomForestRegressor {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            random_seed: None,
            trees: Vec::new(),
            feature_names: None,
            importance_sums: HashMap::new(),
            training_time: 0.0,
        }
    }

    /// Set the number of trees in the forest
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Set the maximum depth of the trees
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the number of features considered per split
    pub fn max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Set the random seed for reproducibility
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Feature names seen during fit
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// An unfitted copy carrying the same hyperparameters
    fn fresh(&self) -> Self {
        RandomForestRegressor {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features,
            random_seed: self.random_seed,
            trees: Vec::new(),
            feature_names: None,
            importance_sums: HashMap::new(),
            training_time: 0.0,
        }
    }

    fn build_tree(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let n = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;

        let at_max_depth = self.max_depth.is_some_and(|d| depth >= d);
        if n < self.min_samples_split || at_max_depth {
            return TreeNode::Leaf { value: mean };
        }

        let parent_sse = sse(y, indices, mean);
        if parent_sse <= f64::EPSILON {
            return TreeNode::Leaf { value: mean };
        }

        let n_features = x[0].len();
        let candidates = self.candidate_features(n_features, rng);

        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, total sse)
        for &feature in &candidates {
            if let Some((threshold, split_sse)) = best_split_for_feature(x, y, indices, feature) {
                let improves = best.map_or(true, |(_, _, s)| split_sse < s);
                if improves {
                    best = Some((feature, threshold, split_sse));
                }
            }
        }

        let (feature, threshold, split_sse) = match best {
            Some(b) if b.2 < parent_sse => b,
            _ => return TreeNode::Leaf { value: mean },
        };

        if let Some(names) = &self.feature_names {
            *self
                .importance_sums
                .entry(names[feature].clone())
                .or_insert(0.0) += parent_sse - split_sse;
        }

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| x[i][feature] <= threshold);

        let left = self.build_tree(x, y, &left_indices, depth + 1, rng);
        let right = self.build_tree(x, y, &right_indices, depth + 1, rng);

        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Feature indices examined at one split: all of them, or a random
    /// subset of `max_features` without replacement
    fn candidate_features(&self, n_features: usize, rng: &mut StdRng) -> Vec<usize> {
        match self.max_features {
            Some(m) if m < n_features => {
                let mut pool: Vec<usize> = (0..n_features).collect();
                for i in 0..m {
                    let j = rng.random_range(i..n_features);
                    pool.swap(i, j);
                }
                pool.truncate(m);
                pool
            }
            _ => (0..n_features).collect(),
        }
    }
}

/// Sum of squared errors of `y[indices]` around `mean`
fn sse(y: &[f64], indices: &[usize], mean: f64) -> f64 {
    indices
        .iter()
        .map(|&i| {
            let d = y[i] - mean;
            d * d
        })
        .sum()
}

/// Best threshold for one feature, by total child SSE.
///
/// Sorts the rows by feature value and sweeps the split point with running
/// sums, so each candidate threshold is evaluated in constant time. Returns
/// None when the feature is constant over the rows.
fn best_split_for_feature(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    feature: usize,
) -> Option<(f64, f64)> {
    let mut order: Vec<usize> = indices.to_vec();
    order.sort_by(|&a, &b| {
        x[a][feature]
            .partial_cmp(&x[b][feature])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = order.len();
    let total_sum: f64 = order.iter().map(|&i| y[i]).sum();
    let total_sq_sum: f64 = order.iter().map(|&i| y[i] * y[i]).sum();

    let mut left_sum = 0.0;
    let mut left_sq_sum = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for split in 1..n {
        let prev = order[split - 1];
        let curr = order[split];
        left_sum += y[prev];
        left_sq_sum += y[prev] * y[prev];

        // A threshold must separate two distinct feature values
        if x[prev][feature] == x[curr][feature] {
            continue;
        }

        let left_n = split as f64;
        let right_n = (n - split) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq_sum = total_sq_sum - left_sq_sum;

        let left_sse = left_sq_sum - left_sum * left_sum / left_n;
        let right_sse = right_sq_sum - right_sum * right_sum / right_n;
        let split_sse = left_sse + right_sse;

        if best.map_or(true, |(_, s)| split_sse < s) {
            let threshold = (x[prev][feature] + x[curr][feature]) / 2.0;
            best = Some((threshold, split_sse));
        }
    }

    best
}

impl SupervisedModel for RandomForestRegressor {
    fn fit(&mut self, train_data: &DataFrame, target_column: &str) -> Result<()> {
        let start = Instant::now();

        let y = train_data.numeric_values(target_column)?;
        if y.is_empty() {
            return Err(Error::EmptyData("no rows to train on".to_string()));
        }

        let feature_names: Vec<String> = train_data
            .numeric_column_names()
            .into_iter()
            .filter(|name| name != target_column)
            .collect();
        if feature_names.is_empty() {
            return Err(Error::InvalidInput(
                "no numeric feature columns found".to_string(),
            ));
        }

        let x = train_data.numeric_matrix(&feature_names)?;
        self.feature_names = Some(feature_names);
        self.importance_sums.clear();

        let mut rng = match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let n = y.len();
        let all_indices: Vec<usize> = (0..n).collect();
        let mut trees = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            // Bootstrap sample, drawn with replacement
            let sample: Vec<usize> = all_indices
                .iter()
                .map(|_| rng.random_range(0..n))
                .collect();
            trees.push(self.build_tree(&x, &y, &sample, 0, &mut rng));
        }

        self.trees = trees;
        self.training_time = start.elapsed().as_secs_f64();
        Ok(())
    }

    fn predict(&self, data: &DataFrame) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(Error::NotFitted("RandomForestRegressor".to_string()));
        }
        let feature_names = self
            .feature_names
            .as_ref()
            .ok_or_else(|| Error::NotFitted("RandomForestRegressor".to_string()))?;

        let x = data.numeric_matrix(feature_names)?;
        let predictions = x
            .iter()
            .map(|row| {
                self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
            })
            .collect();
        Ok(predictions)
    }

    fn feature_importances(&self) -> Option<HashMap<String, f64>> {
        if self.trees.is_empty() {
            return None;
        }
        let total: f64 = self.importance_sums.values().sum();
        if total <= 0.0 {
            return None;
        }
        Some(
            self.importance_sums
                .iter()
                .map(|(name, sum)| (name.clone(), sum / total))
                .collect(),
        )
    }
}

impl ModelEvaluator for RandomForestRegressor {
    fn evaluate(&self, test_data: &DataFrame, test_target: &str) -> Result<ModelMetrics> {
        let y_true = test_data.numeric_values(test_target)?;

        let start = Instant::now();
        let y_pred = self.predict(test_data)?;
        let prediction_time = start.elapsed().as_secs_f64();

        let mut metrics = ModelMetrics::new();
        metrics.add_metric("mse", mean_squared_error(&y_true, &y_pred)?);
        metrics.add_metric("rmse", root_mean_squared_error(&y_true, &y_pred)?);
        metrics.add_metric("mae", mean_absolute_error(&y_true, &y_pred)?);
        metrics.add_metric("r2", r2_score(&y_true, &y_pred)?);
        metrics.set_training_time(self.training_time);
        metrics.set_prediction_time(prediction_time);
        Ok(metrics)
    }

    /// Deterministic k-fold split in row order (no shuffling)
    fn cross_validate(
        &self,
        data: &DataFrame,
        target: &str,
        folds: usize,
    ) -> Result<Vec<ModelMetrics>> {
        if folds < 2 {
            return Err(Error::InvalidInput(
                "cross-validation requires at least 2 folds".to_string(),
            ));
        }
        let n = data.row_count();
        if n < folds {
            return Err(Error::InvalidInput(format!(
                "cannot split {} rows into {} folds",
                n, folds
            )));
        }

        let mut results = Vec::with_capacity(folds);
        for fold in 0..folds {
            let test_start = fold * n / folds;
            let test_end = (fold + 1) * n / folds;

            let test_indices: Vec<usize> = (test_start..test_end).collect();
            let train_indices: Vec<usize> =
                (0..test_start).chain(test_end..n).collect();

            let train_fold = data.take_rows(&train_indices)?;
            let test_fold = data.take_rows(&test_indices)?;

            let mut model = self.fresh();
            model.fit(&train_fold, target)?;
            results.push(model.evaluate(&test_fold, target)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::Column;
    use crate::series::Series;

    fn training_frame() -> DataFrame {
        // y follows x1 with a step at 5; x2 is noise-free filler
        let x1: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..20).map(|i| (i % 3) as f64).collect();
        let y: Vec<f64> = x1.iter().map(|&v| if v < 5.0 { 10.0 } else { 50.0 }).collect();

        let mut df = DataFrame::new();
        df.add_column(
            "x1".to_string(),
            Column::Float64(Series::from_vec(x1, Some("x1".to_string()))),
        )
        .unwrap();
        df.add_column(
            "x2".to_string(),
            Column::Float64(Series::from_vec(x2, Some("x2".to_string()))),
        )
        .unwrap();
        df.add_column(
            "y".to_string(),
            Column::Float64(Series::from_vec(y, Some("y".to_string()))),
        )
        .unwrap();
        df
    }

    #[test]
    fn test_forest_fit_predict_shape() {
        let df = training_frame();
        let mut model = RandomForestRegressor::new()
            .n_estimators(10)
            .random_seed(42);
        model.fit(&df, "y").unwrap();

        let predictions = model.predict(&df).unwrap();
        assert_eq!(predictions.len(), df.row_count());
        assert!(predictions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_forest_learns_step_function() {
        let df = training_frame();
        let mut model = RandomForestRegressor::new()
            .n_estimators(20)
            .random_seed(7);
        model.fit(&df, "y").unwrap();

        let predictions = model.predict(&df).unwrap();
        // Rows far from the step should be classified cleanly
        assert!(predictions[0] < 30.0);
        assert!(predictions[19] > 30.0);
    }

    #[test]
    fn test_forest_seeded_runs_reproducible() {
        let df = training_frame();

        let mut a = RandomForestRegressor::new().n_estimators(5).random_seed(11);
        let mut b = RandomForestRegressor::new().n_estimators(5).random_seed(11);
        a.fit(&df, "y").unwrap();
        b.fit(&df, "y").unwrap();

        assert_eq!(a.predict(&df).unwrap(), b.predict(&df).unwrap());
    }

    #[test]
    fn test_forest_constant_target() {
        let mut df = DataFrame::new();
        df.add_column(
            "x".to_string(),
            Column::Float64(Series::from_vec(vec![1.0, 2.0, 3.0, 4.0], None)),
        )
        .unwrap();
        df.add_column(
            "y".to_string(),
            Column::Float64(Series::from_vec(vec![5.0, 5.0, 5.0, 5.0], None)),
        )
        .unwrap();

        let mut model = RandomForestRegressor::new().n_estimators(3).random_seed(1);
        model.fit(&df, "y").unwrap();
        for p in model.predict(&df).unwrap() {
            assert!((p - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_forest_predict_before_fit() {
        let model = RandomForestRegressor::new();
        assert!(matches!(
            model.predict(&training_frame()),
            Err(Error::NotFitted(_))
        ));
    }

    #[test]
    fn test_forest_missing_target() {
        let df = training_frame();
        let mut model = RandomForestRegressor::new();
        assert!(matches!(
            model.fit(&df, "nope"),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_forest_evaluate_reports_metrics() {
        let df = training_frame();
        let mut model = RandomForestRegressor::new().n_estimators(10).random_seed(3);
        model.fit(&df, "y").unwrap();

        let metrics = model.evaluate(&df, "y").unwrap();
        assert!(metrics.get_metric("rmse").is_some());
        assert!(metrics.get_metric("r2").is_some());
        assert!(*metrics.get_metric("r2").unwrap() > 0.5);
    }

    #[test]
    fn test_forest_cross_validate_fold_count() {
        let df = training_frame();
        let model = RandomForestRegressor::new().n_estimators(5).random_seed(2);
        let results = model.cross_validate(&df, "y", 4).unwrap();
        assert_eq!(results.len(), 4);

        assert!(model.cross_validate(&df, "y", 1).is_err());
    }

    #[test]
    fn test_forest_feature_importances_sum_to_one() {
        let df = training_frame();
        let mut model = RandomForestRegressor::new().n_estimators(10).random_seed(5);
        model.fit(&df, "y").unwrap();

        let importances = model.feature_importances().unwrap();
        let total: f64 = importances.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        // x1 carries the signal
        assert!(importances["x1"] > importances.get("x2").copied().unwrap_or(0.0));
    }
}
