//! Fit a fixed panel of regression and classification models against one
//! dataset and compare them in a table.
//!
//! ```no_run
//! use teburu::{datasets, RegressionResults};
//!
//! let dataset = datasets::diabetes_like(42)?;
//! let table = RegressionResults::new(&dataset).df_report()?;
//! println!("{table}");
//! # Ok::<(), teburu::TeburuError>(())
//! ```

pub mod config;

pub use teburu_ml::{
    datasets, evaluation, features, models, results, training, ClassificationModel, ClassificationResults,
    Classifier, ClassifierKind, RegressionModel, RegressionResults, Regressor, RegressorKind, MODEL_LABELS,
};
pub use teburu_models::{
    BoostingSettings, ClassificationScore, Dataset, ForestSettings, LogisticSettings, ModelSettings,
    RegressionScore, Result, SplitConfig, TeburuError, TrainTestSplit, TreeSettings,
};

pub use polars::prelude::DataFrame;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "teburu=info";

/// Install a fmt subscriber filtered by `RUST_LOG`, or by `default_filter`
/// when the variable is unset. Later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
