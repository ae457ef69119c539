//! Feature-engineering pipeline: drop, fill, encode, derive, prune.
//!
//! A [`FeaturePipeline`] is fitted once (its label encoders learn their
//! category→code maps) and then applied to any number of datasets. Applying
//! the same fitted pipeline to the training and evaluation sets guarantees
//! matching column sets and identical codes — the identical-treatment
//! contract.

use log::info;

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::io::EncoderSpec;
use crate::ml::feature_engineering::{create_interactions, Interaction};
use crate::ml::preprocessing::{
    encode_from_spec, fill_all_na_values, fill_na_values, LabelEncoder,
};

/// Everything the pipeline needs to know about the dataset's columns
#[derive(Debug, Clone, Default)]
pub struct PipelineParams {
    /// Columns removed before any other step
    pub drop_columns: Vec<String>,
    /// Columns filled with `fill_value` before the blanket fill
    pub fill_columns: Vec<String>,
    /// Constant used for `fill_columns`
    pub fill_value: String,
    /// Ordered category lists for ordinal encoding
    pub encoder_specs: EncoderSpec,
    /// Columns encoded with fitted label encoders
    pub label_columns: Vec<String>,
    /// Columns retained only as encoding/interaction inputs, removed last
    pub exclude_columns: Vec<String>,
    /// Derived-column table
    pub interactions: Vec<Interaction>,
}

/// The pipeline orchestrator
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    params: PipelineParams,
    label_encoders: Option<Vec<(String, LabelEncoder)>>,
}

impl FeaturePipeline {
    /// Create an unfitted pipeline from its parameters
    pub fn new(params: PipelineParams) -> Self {
        Self {
            params,
            label_encoders: None,
        }
    }

    /// The pipeline parameters
    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Steps 1–2: drop unwanted columns, then the constant fill, then the
    /// blanket fill. The constant fill runs first so custom-filled columns
    /// are already complete when means and modes are computed.
    fn clean(&self, df: &DataFrame) -> Result<DataFrame> {
        let dropped = df.drop_columns(&self.params.drop_columns)?;
        let filled = fill_na_values(
            &dropped,
            &self.params.fill_columns,
            &self.params.fill_value,
        )?;
        fill_all_na_values(&filled)
    }

    /// Learn the label encoders from a cleaned copy of the data
    pub fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let cleaned = self.clean(df)?;

        let mut encoders = Vec::with_capacity(self.params.label_columns.len());
        for column in &self.params.label_columns {
            if !cleaned.contains_column(column) {
                return Err(Error::MissingColumn(column.clone()));
            }
            let mut encoder = LabelEncoder::new();
            encoder.fit(&cleaned, column)?;
            info!(
                "label encoder for '{}' learned {} classes",
                column,
                encoder.classes().len()
            );
            encoders.push((column.clone(), encoder));
        }

        self.label_encoders = Some(encoders);
        Ok(())
    }

    /// Apply the full transform to one dataset.
    ///
    /// Fill statistics are computed from this dataset alone; only the label
    /// encodings are shared state, fixed at fit time.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let encoders = self
            .label_encoders
            .as_ref()
            .ok_or_else(|| Error::NotFitted("FeaturePipeline".to_string()))?;

        let cleaned = self.clean(df)?;

        let mut encoded = encode_from_spec(&cleaned, &self.params.encoder_specs)?;
        for (column, encoder) in encoders {
            if !encoded.contains_column(column) {
                return Err(Error::MissingColumn(column.clone()));
            }
            encoded = encoder.transform(&encoded, column)?;
        }

        let derived = create_interactions(&encoded, &self.params.interactions)?;
        derived.drop_columns(&self.params.exclude_columns)
    }

    /// Fit on a dataset and transform it in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }
}
