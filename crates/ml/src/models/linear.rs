//! Linear model families, delegated to linfa.

use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use teburu_models::{LogisticSettings, Result, TeburuError};
use tracing::debug;

use super::{check_input, check_width, ClassificationModel, RegressionModel};

/// Ordinary least squares with an intercept.
#[derive(Default)]
pub struct OrdinaryLeastSquares {
    fitted: Option<FittedLinearRegression<f64>>,
    n_features: usize,
}

impl OrdinaryLeastSquares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fitted.as_ref().map(FittedLinearRegression::intercept)
    }
}

impl RegressionModel for OrdinaryLeastSquares {
    fn model_name(&self) -> &str {
        "linear_regression"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        check_input(x, y.len())?;
        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        let model = LinearRegression::default()
            .fit(&dataset)
            .map_err(|e| TeburuError::fit(self.model_name(), e))?;

        debug!(n_samples = x.nrows(), intercept = model.intercept(), "linear regression fitted");
        self.fitted = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let model = self
            .fitted
            .as_ref()
            .ok_or_else(|| TeburuError::not_fitted(self.model_name()))?;
        check_width(x, self.n_features)?;

        let predictions: Array1<f64> = model.predict(&x);
        Ok(predictions)
    }
}

/// Binary logistic regression with an L2 penalty.
pub struct LogisticModel {
    alpha: f64,
    max_iterations: u64,
    fitted: Option<FittedLogisticRegression<f64, usize>>,
    /// Class index that linfa treats as the positive label.
    positive_class: usize,
    n_features: usize,
}

impl LogisticModel {
    pub fn new(settings: &LogisticSettings) -> Self {
        Self {
            alpha: settings.alpha,
            max_iterations: settings.max_iterations,
            fitted: None,
            positive_class: 1,
            n_features: 0,
        }
    }

    /// Probability of class index 1 for every row.
    pub fn class_one_probability(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let model = self
            .fitted
            .as_ref()
            .ok_or_else(|| TeburuError::not_fitted(self.model_name()))?;
        check_width(x, self.n_features)?;

        let positive = model.predict_probabilities(&x);
        Ok(if self.positive_class == 1 {
            positive
        } else {
            positive.mapv(|p| 1.0 - p)
        })
    }
}

impl ClassificationModel for LogisticModel {
    fn model_name(&self) -> &str {
        "logistic_regression"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()> {
        check_input(x, y.len())?;
        if n_classes != 2 {
            return Err(TeburuError::fit(
                self.model_name(),
                format!("binary targets required, got {n_classes} classes"),
            ));
        }

        let targets: Array1<usize> = y.iter().copied().collect();
        let dataset = Dataset::new(x.to_owned(), targets);
        let model = LogisticRegression::default()
            .alpha(self.alpha)
            .max_iterations(self.max_iterations)
            .fit(&dataset)
            .map_err(|e| TeburuError::fit(self.model_name(), e))?;

        // linfa picks its own positive label; recover it from one confident
        // training prediction.
        let probabilities = model.predict_probabilities(&x);
        let labels: Array1<usize> = model.predict(&x);
        self.positive_class = probabilities
            .iter()
            .zip(labels.iter())
            .find(|(p, _)| (**p - 0.5).abs() > 1e-9)
            .map_or(1, |(&p, &label)| if p > 0.5 { label } else { 1 - label });

        debug!(n_samples = x.nrows(), positive_class = self.positive_class, "logistic regression fitted");
        self.fitted = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let p_one = self.class_one_probability(x)?;
        let mut proba = Array2::zeros((p_one.len(), 2));
        for (mut row, &p) in proba.rows_mut().into_iter().zip(p_one.iter()) {
            row[0] = 1.0 - p;
            row[1] = p;
        }
        Ok(proba)
    }
}
