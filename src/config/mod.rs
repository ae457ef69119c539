//! Configuration management
//!
//! Resolves the file-system paths the run needs: the two input tables, the
//! encoder-specification file, the two plot outputs, and the submission
//! output. Values come from a TOML file with environment-variable
//! overrides; the rest of the crate consumes only the resolved path
//! strings.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::core::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Input dataset locations
    pub data: DataConfig,
    /// Plot output locations
    pub eda: EdaConfig,
    /// Submission output location
    pub results: ResultsConfig,
}

/// Input dataset configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Folder holding the input tables
    pub folder: String,
    /// Training table file name
    pub train: String,
    /// Evaluation table file name
    pub test: String,
    /// Encoder-specification file (JSON)
    pub encoders: String,
}

/// Plot output configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdaConfig {
    /// Folder receiving the plot images
    pub folder: String,
    /// Missing-value heatmap file name
    pub heatmap: String,
    /// Distribution collage file name
    pub collage: String,
}

/// Submission output configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultsConfig {
    /// Folder receiving the submission file
    pub folder: String,
    /// Submission file name
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data: DataConfig {
                folder: "data".to_string(),
                train: "train.csv".to_string(),
                test: "test.csv".to_string(),
                encoders: "msc/map_encoders.json".to_string(),
            },
            eda: EdaConfig {
                folder: "images".to_string(),
                heatmap: "heatmap_of_nulls.png".to_string(),
                collage: "collage_of_plots.png".to_string(),
            },
            results: ResultsConfig {
                folder: "results".to_string(),
                name: "submission.csv".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration with precedence: defaults -> file -> environment
    ///
    /// The file is optional; when it is absent the defaults apply.
    pub fn load<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) if path.as_ref().exists() => Self::load_from_file(path.as_ref())?,
            _ => AppConfig::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::ConfigurationError(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::ConfigurationError(format!("failed to parse TOML config: {}", e)))
    }

    /// Apply `HOUSE_PRICES_*` environment-variable overrides
    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            ("HOUSE_PRICES_DATA_FOLDER", &mut self.data.folder),
            ("HOUSE_PRICES_TRAIN", &mut self.data.train),
            ("HOUSE_PRICES_TEST", &mut self.data.test),
            ("HOUSE_PRICES_ENCODERS", &mut self.data.encoders),
            ("HOUSE_PRICES_EDA_FOLDER", &mut self.eda.folder),
            ("HOUSE_PRICES_HEATMAP", &mut self.eda.heatmap),
            ("HOUSE_PRICES_COLLAGE", &mut self.eda.collage),
            ("HOUSE_PRICES_RESULTS_FOLDER", &mut self.results.folder),
            ("HOUSE_PRICES_SUBMISSION", &mut self.results.name),
        ];

        for (var, field) in overrides {
            if let Ok(value) = env::var(var) {
                *field = value;
            }
        }
    }

    /// Reject empty path components
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("data.folder", &self.data.folder),
            ("data.train", &self.data.train),
            ("data.test", &self.data.test),
            ("data.encoders", &self.data.encoders),
            ("eda.folder", &self.eda.folder),
            ("eda.heatmap", &self.eda.heatmap),
            ("eda.collage", &self.eda.collage),
            ("results.folder", &self.results.folder),
            ("results.name", &self.results.name),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(Error::ConfigurationError(format!(
                    "configuration field '{}' must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Relative path of the training table
    pub fn train_path(&self) -> String {
        format!("{}/{}", self.data.folder, self.data.train)
    }

    /// Relative path of the evaluation table
    pub fn test_path(&self) -> String {
        format!("{}/{}", self.data.folder, self.data.test)
    }

    /// Relative path of the encoder-specification file
    pub fn encoders_path(&self) -> String {
        self.data.encoders.clone()
    }

    /// Relative path of the missing-value heatmap image
    pub fn heatmap_path(&self) -> String {
        format!("{}/{}", self.eda.folder, self.eda.heatmap)
    }

    /// Relative path of the distribution collage image
    pub fn collage_path(&self) -> String {
        format!("{}/{}", self.eda.folder, self.eda.collage)
    }

    /// Relative path of the submission file
    pub fn submission_path(&self) -> String {
        format!("{}/{}", self.results.folder, self.results.name)
    }
}
