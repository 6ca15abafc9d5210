//! Print both comparison tables for the canned toy datasets.
//!
//! ```text
//! cargo run --release --example compare
//! TEBURU__MODELS__SPLIT__SEED=7 cargo run --release --example compare
//! ```

use anyhow::{Context, Result};
use teburu::config::AppConfig;
use teburu::{datasets, ClassificationResults, RegressionResults};
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::new().context("loading configuration")?;
    teburu::init_tracing(&config.logging.filter);

    let settings = config.model_settings()?;
    let seed = settings.split.seed;
    info!(seed, test_ratio = settings.split.test_ratio, "comparing model panel");

    let diabetes = datasets::diabetes_like(seed)?;
    let regression = RegressionResults::with_settings(&diabetes, settings.clone())?;
    println!("Regression (RMSE, lower is better)\n{}", regression.df_report()?);

    let cancer = datasets::breast_cancer_like(seed)?;
    let classification = ClassificationResults::with_settings(&cancer, settings)?;
    println!("Classification\n{}", classification.df_report()?);

    Ok(())
}
