#![allow(clippy::result_large_err)]

//! House-prices pipeline crate
//!
//! Loads the Ames housing tables, fills missing values, encodes categorical
//! and ordinal variables, derives interaction features, trains a
//! random-forest regressor, and writes a submission file plus two
//! diagnostic plots.

// Core module with the error type
pub mod core;

// Data structures
pub mod dataframe;
pub mod na;
pub mod series;

// Input/output
pub mod config;
pub mod io;

// Machine learning and visualization
pub mod ml;
pub mod vis;

// Re-export core types
pub use crate::core::error::{Error, Result};

pub use dataframe::{Column, DataFrame};
pub use na::NA;
pub use series::Series;

pub use config::AppConfig;
pub use io::{read_csv, write_csv, write_submission, EncoderSpec};

// Machine learning features
pub use ml::feature_engineering::{
    create_interactions, house_interactions, Interaction, InteractionOp,
};
pub use ml::metrics::regression::{
    mean_absolute_error, mean_squared_error, r2_score, root_mean_squared_error,
};
pub use ml::models::{ModelEvaluator, ModelMetrics, RandomForestRegressor, SupervisedModel};
pub use ml::pipeline::{FeaturePipeline, PipelineParams};
pub use ml::preprocessing::{
    encode_from_spec, fill_all_na_values, fill_na_values, LabelEncoder, OrdinalEncoder,
};
pub use vis::{distribution_collage, missing_value_heatmap, PlotSettings};

/// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
