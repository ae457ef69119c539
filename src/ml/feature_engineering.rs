//! Interaction features derived from arithmetic combinations of columns.
//!
//! Interactions are data, not code paths: each derived column is described
//! by a declarative (name, operator, inputs) row and evaluated generically,
//! so new interactions are added by extending the table.

use crate::core::error::{Error, Result};
use crate::dataframe::{Column, DataFrame};
use crate::na::NA;
use crate::series::Series;

/// Arithmetic operator combining the input columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOp {
    Sum,
    Product,
}

/// One derived column: its name, operator, and input columns
#[derive(Debug, Clone)]
pub struct Interaction {
    pub name: String,
    pub op: InteractionOp,
    pub inputs: Vec<String>,
}

impl Interaction {
    /// A sum over the given input columns
    pub fn sum<S: Into<String>>(name: S, inputs: &[&str]) -> Self {
        Self {
            name: name.into(),
            op: InteractionOp::Sum,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A product over the given input columns
    pub fn product<S: Into<String>>(name: S, inputs: &[&str]) -> Self {
        Self {
            name: name.into(),
            op: InteractionOp::Product,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The fixed interaction table for the housing dataset
pub fn house_interactions() -> Vec<Interaction> {
    vec![
        Interaction::product("BsmtRating", &["BsmtCond", "BsmtQual"]),
        Interaction::product("ExterRating", &["ExterCond", "ExterQual"]),
        Interaction::product("BsmtFinTypeRating", &["BsmtFinType1", "BsmtFinType2"]),
        Interaction::sum("BsmtBath", &["BsmtFullBath", "BsmtHalfBath"]),
        Interaction::sum("Bath", &["FullBath", "HalfBath"]),
        Interaction::sum(
            "PorchArea",
            &[
                "OpenPorchSF",
                "EnclosedPorch",
                "ThreeSeasonPorch",
                "ScreenPorch",
            ],
        ),
    ]
}

/// Append each derived column to a copy of the dataset.
///
/// Predecessor columns must exist and be numeric; otherwise the call fails
/// with `MissingColumn` before any column is appended. Predecessors are
/// retained — removing them is the orchestrator's responsibility. A missing
/// entry in any input row makes the derived entry missing.
pub fn create_interactions(df: &DataFrame, interactions: &[Interaction]) -> Result<DataFrame> {
    for interaction in interactions {
        for input in &interaction.inputs {
            let present_numeric = df
                .contains_column(input)
                .then(|| df.column(input).map(|c| c.is_numeric()).unwrap_or(false))
                .unwrap_or(false);
            if !present_numeric {
                return Err(Error::MissingColumn(input.clone()));
            }
        }
    }

    let mut result = df.clone();
    for interaction in interactions {
        let inputs: Vec<&Series<f64>> = interaction
            .inputs
            .iter()
            .map(|name| result.column(name).map(|c| c.as_float64().unwrap()))
            .collect::<Result<_>>()?;

        let mut derived: Vec<NA<f64>> = Vec::with_capacity(df.row_count());
        for i in 0..df.row_count() {
            let combined = inputs
                .iter()
                .map(|series| *series.get(i).unwrap())
                .reduce(|acc, v| match interaction.op {
                    InteractionOp::Sum => acc + v,
                    InteractionOp::Product => acc * v,
                })
                .unwrap_or(NA::NA);
            derived.push(combined);
        }

        result.add_column(
            interaction.name.clone(),
            Column::Float64(Series::new(derived, Some(interaction.name.clone()))),
        )?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_df(columns: &[(&str, Vec<f64>)]) -> DataFrame {
        let mut df = DataFrame::new();
        for (name, values) in columns {
            df.add_column(
                name.to_string(),
                Column::Float64(Series::from_vec(values.clone(), Some(name.to_string()))),
            )
            .unwrap();
        }
        df
    }

    #[test]
    fn test_product_interaction_rowwise() {
        let df = numeric_df(&[
            ("BsmtCond", vec![2.0, 3.0]),
            ("BsmtQual", vec![3.0, 4.0]),
        ]);
        let interactions = vec![Interaction::product("BsmtRating", &["BsmtCond", "BsmtQual"])];

        let result = create_interactions(&df, &interactions).unwrap();
        assert_eq!(result.row_count(), df.row_count());
        assert_eq!(
            result.numeric_values("BsmtRating").unwrap(),
            vec![6.0, 12.0]
        );
        // predecessors retained
        assert!(result.contains_column("BsmtCond"));
    }

    #[test]
    fn test_sum_interaction_many_inputs() {
        let df = numeric_df(&[
            ("OpenPorchSF", vec![10.0]),
            ("EnclosedPorch", vec![0.0]),
            ("ThreeSeasonPorch", vec![0.0]),
            ("ScreenPorch", vec![5.0]),
        ]);
        let interactions = vec![Interaction::sum(
            "PorchArea",
            &[
                "OpenPorchSF",
                "EnclosedPorch",
                "ThreeSeasonPorch",
                "ScreenPorch",
            ],
        )];

        let result = create_interactions(&df, &interactions).unwrap();
        assert_eq!(result.numeric_values("PorchArea").unwrap(), vec![15.0]);
    }

    #[test]
    fn test_missing_predecessor() {
        let df = numeric_df(&[("FullBath", vec![2.0])]);
        let interactions = vec![Interaction::sum("Bath", &["FullBath", "HalfBath"])];
        assert!(matches!(
            create_interactions(&df, &interactions),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_non_numeric_predecessor() {
        let mut df = numeric_df(&[("FullBath", vec![2.0])]);
        df.add_column(
            "HalfBath".to_string(),
            Column::Str(Series::from_vec(vec!["1".to_string()], None)),
        )
        .unwrap();
        let interactions = vec![Interaction::sum("Bath", &["FullBath", "HalfBath"])];
        assert!(matches!(
            create_interactions(&df, &interactions),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_na_input_propagates() {
        let mut df = DataFrame::new();
        df.add_column(
            "a".to_string(),
            Column::Float64(Series::from_options(vec![Some(1.0), None], None)),
        )
        .unwrap();
        df.add_column(
            "b".to_string(),
            Column::Float64(Series::from_vec(vec![2.0, 3.0], None)),
        )
        .unwrap();

        let result =
            create_interactions(&df, &[Interaction::product("ab", &["a", "b"])]).unwrap();
        let series = result.column("ab").unwrap().as_float64().unwrap();
        assert_eq!(series.get(0), Some(&NA::Value(2.0)));
        assert!(series.get(1).unwrap().is_na());
    }

    #[test]
    fn test_house_interactions_full_table() {
        let df = numeric_df(&[
            ("BsmtCond", vec![2.0]),
            ("BsmtQual", vec![3.0]),
            ("ExterCond", vec![1.0]),
            ("ExterQual", vec![4.0]),
            ("BsmtFinType1", vec![1.0]),
            ("BsmtFinType2", vec![2.0]),
            ("BsmtFullBath", vec![1.0]),
            ("BsmtHalfBath", vec![0.0]),
            ("FullBath", vec![2.0]),
            ("HalfBath", vec![1.0]),
            ("OpenPorchSF", vec![10.0]),
            ("EnclosedPorch", vec![0.0]),
            ("ThreeSeasonPorch", vec![0.0]),
            ("ScreenPorch", vec![5.0]),
        ]);

        let result = create_interactions(&df, &house_interactions()).unwrap();
        assert_eq!(result.numeric_values("BsmtRating").unwrap(), vec![6.0]);
        assert_eq!(result.numeric_values("ExterRating").unwrap(), vec![4.0]);
        assert_eq!(
            result.numeric_values("BsmtFinTypeRating").unwrap(),
            vec![2.0]
        );
        assert_eq!(result.numeric_values("BsmtBath").unwrap(), vec![1.0]);
        assert_eq!(result.numeric_values("Bath").unwrap(), vec![3.0]);
        assert_eq!(result.numeric_values("PorchArea").unwrap(), vec![15.0]);
    }
}
