//! The canned model panel.
//!
//! Each task type has a fixed, ordered set of four model kinds. A kind builds
//! a boxed model behind one of two capability traits, so the wrappers in
//! [`crate::training`] never need to know which algorithm they are driving.

pub mod decision_tree;
pub mod gradient_boosting;
pub mod linear;
pub mod random_forest;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use teburu_models::{ModelSettings, Result, TeburuError};

pub use decision_tree::DecisionTree;
pub use gradient_boosting::{GradientBoosting, Objective};
pub use linear::{LogisticModel, OrdinaryLeastSquares};
pub use random_forest::{MaxFeatures, RandomForest};

/// Row labels used by every comparison table, in canonical order.
pub const MODEL_LABELS: [&str; 4] = ["linear_regression", "decision_tree", "random_forest", "xgboost"];

pub trait RegressionModel: Send + Sync {
    fn model_name(&self) -> &str;
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()>;
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}

pub trait ClassificationModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// `y` holds class indices in `0..n_classes`.
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()>;

    /// One row per sample, one column per class.
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().into_iter().map(argmax).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegressorKind {
    LinearRegression,
    DecisionTree,
    RandomForest,
    GradientBoosting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    LogisticRegression,
    DecisionTree,
    RandomForest,
    GradientBoosting,
}

impl RegressorKind {
    pub const ALL: [Self; 4] = [
        Self::LinearRegression,
        Self::DecisionTree,
        Self::RandomForest,
        Self::GradientBoosting,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::LinearRegression => MODEL_LABELS[0],
            Self::DecisionTree => MODEL_LABELS[1],
            Self::RandomForest => MODEL_LABELS[2],
            Self::GradientBoosting => MODEL_LABELS[3],
        }
    }

    pub fn build(self, settings: &ModelSettings) -> Box<dyn RegressionModel> {
        match self {
            Self::LinearRegression => Box::new(OrdinaryLeastSquares::new()),
            Self::DecisionTree => Box::new(DecisionTree::new(&settings.tree)),
            Self::RandomForest => Box::new(RandomForest::new_regressor(settings)),
            Self::GradientBoosting => Box::new(GradientBoosting::new(&settings.boosting)),
        }
    }
}

impl ClassifierKind {
    pub const ALL: [Self; 4] = [
        Self::LogisticRegression,
        Self::DecisionTree,
        Self::RandomForest,
        Self::GradientBoosting,
    ];

    /// The logistic model keeps the `linear_regression` row label so both
    /// tables line up.
    pub const fn label(self) -> &'static str {
        match self {
            Self::LogisticRegression => MODEL_LABELS[0],
            Self::DecisionTree => MODEL_LABELS[1],
            Self::RandomForest => MODEL_LABELS[2],
            Self::GradientBoosting => MODEL_LABELS[3],
        }
    }

    pub fn build(self, settings: &ModelSettings) -> Box<dyn ClassificationModel> {
        match self {
            Self::LogisticRegression => Box::new(LogisticModel::new(&settings.logistic)),
            Self::DecisionTree => Box::new(DecisionTree::new(&settings.tree)),
            Self::RandomForest => Box::new(RandomForest::new_classifier(settings)),
            Self::GradientBoosting => Box::new(GradientBoosting::new(&settings.boosting)),
        }
    }
}

/// Index of the largest entry; first one wins on ties.
pub(crate) fn argmax(row: ArrayView1<'_, f64>) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_idx, best), (idx, &value)| {
            if value > best {
                (idx, value)
            } else {
                (best_idx, best)
            }
        })
        .0
}

pub(crate) fn check_input(x: ArrayView2<'_, f64>, n_targets: usize) -> Result<()> {
    if x.nrows() != n_targets {
        return Err(TeburuError::ShapeMismatch {
            expected: format!("{} targets", x.nrows()),
            actual: format!("{n_targets} targets"),
        });
    }
    if x.nrows() == 0 {
        return Err(TeburuError::EmptyDataset("rows"));
    }
    Ok(())
}

pub(crate) fn check_width(x: ArrayView2<'_, f64>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(TeburuError::ShapeMismatch {
            expected: format!("{n_features} features"),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}

/// Row-major copy of `x` in the matrix type smartcore estimators take.
pub(crate) fn dense_matrix(x: ArrayView2<'_, f64>) -> Result<DenseMatrix<f64>> {
    let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows).map_err(|e| TeburuError::InvalidData(e.to_string()))
}

/// smartcore counts depth in `u16`; anything deeper is unlimited in practice.
pub(crate) fn depth_limit(depth: usize) -> u16 {
    u16::try_from(depth).unwrap_or(u16::MAX)
}

/// Class indices as the unsigned labels smartcore classifiers expect.
pub(crate) fn class_labels(y: &[usize], n_classes: usize) -> Result<Vec<u32>> {
    y.iter()
        .map(|&class| {
            if class >= n_classes {
                return Err(TeburuError::InvalidData(format!(
                    "class index {class} out of range for {n_classes} classes"
                )));
            }
            u32::try_from(class).map_err(|_| TeburuError::InvalidData(format!("class index {class} too large")))
        })
        .collect()
}
