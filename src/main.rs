//! Pipeline entry point: config, EDA, feature engineering, model, submission.

use std::fs;
use std::process;

use tracing::{error, info};

use house_prices::ml::models::{ModelEvaluator, SupervisedModel};
use house_prices::{
    house_interactions, read_csv, write_submission, AppConfig, DataFrame, EncoderSpec,
    FeaturePipeline, PipelineParams, PlotSettings, RandomForestRegressor, Result,
};

/// Columns removed before any other step
const COLS_TO_DROP: &[&str] = &[
    "Id",
    "Alley",
    "PoolQC",
    "MiscFeature",
    "Fence",
    "MoSold",
    "YrSold",
    "MSSubClass",
    "GarageType",
    "GarageArea",
    "GarageYrBlt",
    "GarageFinish",
    "YearRemodAdd",
    "LandSlope",
    "BsmtUnfSF",
    "BsmtExposure",
    "2ndFlrSF",
    "LowQualFinSF",
    "Condition1",
    "Condition2",
    "Heating",
    "Exterior1st",
    "Exterior2nd",
    "HouseStyle",
    "LotShape",
    "LandContour",
    "LotConfig",
    "Functional",
    "BsmtFinSF1",
    "BsmtFinSF2",
    "FireplaceQu",
    "WoodDeckSF",
    "GarageQual",
    "GarageCond",
    "OverallCond",
];

/// Categorical columns whose absent entries mean "feature not present"
const FILL_CATEGORICAL: &[&str] = &["BsmtQual", "BsmtCond", "BsmtFinType1", "BsmtFinType2"];

/// Columns encoded with fitted label encoders
const LABEL_ENCODE: &[&str] = &["Street", "BldgType", "SaleType", "CentralAir"];

/// Columns retained only as encoding/interaction inputs, removed last
const EXCLUDED_INPUTS: &[&str] = &[
    "OverallQual",
    "ExterCond",
    "ExterQual",
    "BsmtCond",
    "BsmtQual",
    "BsmtFinType1",
    "BsmtFinType2",
    "HeatingQC",
    "OpenPorchSF",
    "EnclosedPorch",
    "ThreeSeasonPorch",
    "ScreenPorch",
    "BsmtFullBath",
    "BsmtHalfBath",
    "FullBath",
    "HalfBath",
];

const TARGET: &str = "SalePrice";
const ID_COLUMN: &str = "Id";

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn write_eda_plots(config: &AppConfig, train: &DataFrame) -> Result<()> {
    fs::create_dir_all(&config.eda.folder)?;

    missing_value_plots(config, train)?;
    info!("EDA plots written to {}", config.eda.folder);
    Ok(())
}

fn missing_value_plots(config: &AppConfig, train: &DataFrame) -> Result<()> {
    let heatmap_settings = PlotSettings::default().with_title("Missing values per variable");
    house_prices::missing_value_heatmap(train, config.heatmap_path(), &heatmap_settings)?;

    let collage_settings = PlotSettings::default().with_title("Distributions");
    house_prices::distribution_collage(
        train,
        &["SaleCondition", "SaleType"],
        &["HouseStyle", "Foundation"],
        TARGET,
        config.collage_path(),
        &collage_settings,
    )
}

fn run() -> Result<()> {
    let config = AppConfig::load(Some("config.toml"))?;

    let data_train = read_csv(config.train_path())?;
    let data_test = read_csv(config.test_path())?;
    info!(
        "loaded {} training rows and {} evaluation rows",
        data_train.row_count(),
        data_test.row_count()
    );

    write_eda_plots(&config, &data_train)?;

    // The evaluation ids are needed for the submission file, but the Id
    // column itself is dropped by the pipeline
    let test_ids = data_test.column(ID_COLUMN)?.to_display_strings();

    let params = PipelineParams {
        drop_columns: to_strings(COLS_TO_DROP),
        fill_columns: to_strings(FILL_CATEGORICAL),
        fill_value: "No".to_string(),
        encoder_specs: EncoderSpec::from_json_file(config.encoders_path())?,
        label_columns: to_strings(LABEL_ENCODE),
        exclude_columns: to_strings(EXCLUDED_INPUTS),
        interactions: house_interactions(),
    };

    let mut pipeline = FeaturePipeline::new(params);
    let train = pipeline.fit_transform(&data_train)?;
    let test = pipeline.transform(&data_test)?;
    info!(
        "pipeline produced {} feature columns",
        train.column_count() - 1
    );

    let mut model = RandomForestRegressor::new()
        .n_estimators(100)
        .max_depth(16)
        .random_seed(42);

    let cv = model.cross_validate(&train, TARGET, 5)?;
    for (fold, metrics) in cv.iter().enumerate() {
        info!(
            "fold {}: rmse = {:.1}, r2 = {:.3}",
            fold,
            metrics.get_metric("rmse").copied().unwrap_or(f64::NAN),
            metrics.get_metric("r2").copied().unwrap_or(f64::NAN),
        );
    }

    model.fit(&train, TARGET)?;
    let predictions = model.predict(&test)?;

    fs::create_dir_all(&config.results.folder)?;
    write_submission(&test_ids, &predictions, TARGET, config.submission_path())?;
    info!(
        "submission with {} predictions written to {}",
        predictions.len(),
        config.submission_path()
    );

    Ok(())
}

fn main() {
    tracing_subscriber::fmt().init();

    if let Err(e) = run() {
        error!("run aborted: {}", e);
        process::exit(1);
    }
}
