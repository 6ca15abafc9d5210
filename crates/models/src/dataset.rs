use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use crate::error::{TeburuError, Result};

/// Predictor matrix and target vector supplied by the caller.
///
/// Rows are samples and columns are features. Targets are continuous for
/// regression and integral class codes for classification. Wrappers and
/// aggregators borrow a `Dataset`; they never copy it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    targets: Array1<f64>,
    feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(features: Array2<f64>, targets: Array1<f64>) -> Result<Self> {
        if features.nrows() != targets.len() {
            return Err(TeburuError::ShapeMismatch {
                expected: format!("{} targets", features.nrows()),
                actual: format!("{} targets", targets.len()),
            });
        }
        if features.nrows() == 0 {
            return Err(TeburuError::EmptyDataset("rows"));
        }
        if features.ncols() == 0 {
            return Err(TeburuError::EmptyDataset("feature columns"));
        }

        let feature_names = (0..features.ncols()).map(|i| format!("x{i}")).collect();
        Ok(Self {
            features,
            targets,
            feature_names,
        })
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.n_features() {
            return Err(TeburuError::ShapeMismatch {
                expected: format!("{} feature names", self.n_features()),
                actual: format!("{} feature names", names.len()),
            });
        }
        self.feature_names = names;
        Ok(self)
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.targets.view()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Sorted distinct target values; the class list for classification.
    pub fn classes(&self) -> Vec<f64> {
        let mut classes: Vec<f64> = self.targets.iter().copied().collect();
        classes.sort_by(f64::total_cmp);
        classes.dedup();
        classes
    }
}
