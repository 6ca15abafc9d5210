//! Gradient boosting with second-order (Newton) tree fitting
//!
//! Every round fits a regression tree to the gradient and hessian of the
//! loss at the current margin:
//! - leaf weight: `w = -G / (H + lambda)`
//! - split gain: `0.5 * [GL²/(HL+λ) + GR²/(HR+λ) - G²/(H+λ)]`
//!
//! The squared-error objective drives the regressor, the logistic objective
//! drives the binary classifier.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use teburu_models::{BoostingSettings, Result, TeburuError};
use tracing::debug;

use super::{check_input, check_width, ClassificationModel, RegressionModel};

const MIN_HESSIAN: f64 = 1e-16;
const PROBA_CLAMP: f64 = 1e-7;

/// Loss minimised by the boosting rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// `0.5 * (margin - y)²`
    SquaredError,
    /// Binary log loss on `sigmoid(margin)`
    Logistic,
}

impl Objective {
    fn gradients(self, margin: f64, target: f64) -> (f64, f64) {
        match self {
            Self::SquaredError => (margin - target, 1.0),
            Self::Logistic => {
                let p = sigmoid(margin);
                (p - target, (p * (1.0 - p)).max(MIN_HESSIAN))
            }
        }
    }
}

#[derive(Debug, Clone)]
enum BoostNode {
    Leaf { weight: f64 },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<BoostNode>,
        right: Box<BoostNode>,
    },
}

impl BoostNode {
    fn predict(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { weight } => return *weight,
                Self::Split { feature_idx, threshold, left, right } => {
                    node = if row[*feature_idx] <= *threshold { left.as_ref() } else { right.as_ref() };
                }
            }
        }
    }
}

/// Boosted ensemble of shallow regression trees.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub reg_lambda: f64,
    pub min_child_weight: f64,
    objective: Objective,
    base_score: f64,
    trees: Vec<BoostNode>,
    n_features: usize,
}

impl GradientBoosting {
    pub fn new(settings: &BoostingSettings) -> Self {
        Self {
            n_estimators: settings.n_estimators,
            learning_rate: settings.learning_rate,
            max_depth: settings.max_depth,
            reg_lambda: settings.reg_lambda,
            min_child_weight: settings.min_child_weight,
            objective: Objective::SquaredError,
            base_score: 0.0,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn fit_regression(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        check_input(x, y.len())?;
        let targets = y.to_vec();
        let base_score = targets.iter().sum::<f64>() / targets.len() as f64;
        self.boost(x, &targets, Objective::SquaredError, base_score)
    }

    /// `y` holds class indices 0 and 1.
    pub fn fit_binary(&mut self, x: ArrayView2<'_, f64>, y: &[usize]) -> Result<()> {
        check_input(x, y.len())?;
        if let Some(&bad) = y.iter().find(|&&class| class > 1) {
            return Err(TeburuError::InvalidData(format!(
                "class index {bad} out of range for a binary target"
            )));
        }
        let targets: Vec<f64> = y.iter().map(|&class| class as f64).collect();
        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let p = mean.clamp(PROBA_CLAMP, 1.0 - PROBA_CLAMP);
        self.boost(x, &targets, Objective::Logistic, (p / (1.0 - p)).ln())
    }

    fn boost(&mut self, x: ArrayView2<'_, f64>, targets: &[f64], objective: Objective, base_score: f64) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(TeburuError::InvalidConfig("boosting needs at least one round".to_string()));
        }
        let n_samples = x.nrows();
        let indices: Vec<usize> = (0..n_samples).collect();
        let mut margin = vec![base_score; n_samples];
        let mut grad = vec![0.0; n_samples];
        let mut hess = vec![0.0; n_samples];

        let mut trees = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            for i in 0..n_samples {
                (grad[i], hess[i]) = objective.gradients(margin[i], targets[i]);
            }

            let tree = self.build_node(x, &grad, &hess, &indices, 0);
            for (i, row) in x.rows().into_iter().enumerate() {
                margin[i] += tree.predict(row);
            }
            trees.push(tree);
        }

        self.trees = trees;
        self.objective = objective;
        self.base_score = base_score;
        self.n_features = x.ncols();
        debug!(n_trees = self.trees.len(), ?objective, base_score, "gradient boosting fitted");
        Ok(())
    }

    /// Leaf weights already carry the learning rate.
    fn build_node(
        &self,
        x: ArrayView2<'_, f64>,
        grad: &[f64],
        hess: &[f64],
        indices: &[usize],
        depth: usize,
    ) -> BoostNode {
        let g_sum: f64 = indices.iter().map(|&i| grad[i]).sum();
        let h_sum: f64 = indices.iter().map(|&i| hess[i]).sum();
        let leaf = BoostNode::Leaf {
            weight: -g_sum / (h_sum + self.reg_lambda) * self.learning_rate,
        };

        if depth >= self.max_depth || indices.len() < 2 || h_sum < self.min_child_weight {
            return leaf;
        }

        let mut best: Option<(usize, f64, f64)> = None;
        let mut order = indices.to_vec();
        for feature_idx in 0..x.ncols() {
            let column = x.column(feature_idx);
            order.sort_by(|&a, &b| column[a].total_cmp(&column[b]));
            if let Some((threshold, gain)) = self.best_threshold(column, grad, hess, &order, g_sum, h_sum) {
                if best.map_or(true, |(_, _, g)| gain > g) {
                    best = Some((feature_idx, threshold, gain));
                }
            }
        }

        let Some((feature_idx, threshold, gain)) = best else {
            return leaf;
        };
        if gain <= 0.0 {
            return leaf;
        }

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| x[[i, feature_idx]] <= threshold);
        if left_indices.is_empty() || right_indices.is_empty() {
            return leaf;
        }

        BoostNode::Split {
            feature_idx,
            threshold,
            left: Box::new(self.build_node(x, grad, hess, &left_indices, depth + 1)),
            right: Box::new(self.build_node(x, grad, hess, &right_indices, depth + 1)),
        }
    }

    fn best_threshold(
        &self,
        column: ArrayView1<'_, f64>,
        grad: &[f64],
        hess: &[f64],
        order: &[usize],
        g_total: f64,
        h_total: f64,
    ) -> Option<(f64, f64)> {
        let lambda = self.reg_lambda;
        let parent = g_total * g_total / (h_total + lambda);
        let mut g_left = 0.0;
        let mut h_left = 0.0;
        let mut best: Option<(f64, f64)> = None;

        for pos in 0..order.len() - 1 {
            let idx = order[pos];
            g_left += grad[idx];
            h_left += hess[idx];

            let lo = column[idx];
            let hi = column[order[pos + 1]];
            if lo >= hi {
                continue;
            }

            let g_right = g_total - g_left;
            let h_right = h_total - h_left;
            if h_left < self.min_child_weight || h_right < self.min_child_weight {
                continue;
            }

            let gain = 0.5 * (g_left * g_left / (h_left + lambda) + g_right * g_right / (h_right + lambda) - parent);
            if best.map_or(true, |(_, g)| gain > g) {
                best = Some((split_point(lo, hi), gain));
            }
        }

        best
    }

    /// Raw additive score before the link function.
    pub fn predict_margin(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(TeburuError::not_fitted("gradient_boosting"));
        }
        check_width(x, self.n_features)?;

        Ok(x.rows()
            .into_iter()
            .map(|row| self.base_score + self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>())
            .collect())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl RegressionModel for GradientBoosting {
    fn model_name(&self) -> &str {
        "gradient_boosting"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        self.fit_regression(x, y)
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.predict_margin(x)
    }
}

impl ClassificationModel for GradientBoosting {
    fn model_name(&self) -> &str {
        "gradient_boosting"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()> {
        if n_classes != 2 {
            return Err(TeburuError::fit(
                "gradient_boosting",
                format!("binary targets required, got {n_classes} classes"),
            ));
        }
        self.fit_binary(x, y)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if self.objective != Objective::Logistic {
            return Err(TeburuError::InvalidData(
                "class probabilities need a logistic objective".to_string(),
            ));
        }
        let margin = self.predict_margin(x)?;
        let mut proba = Array2::zeros((margin.len(), 2));
        for (mut row, &m) in proba.rows_mut().into_iter().zip(margin.iter()) {
            let p = sigmoid(m);
            row[0] = 1.0 - p;
            row[1] = p;
        }
        Ok(proba)
    }
}

/// Midpoint of two sorted distinct values. Adjacent floats can round the
/// midpoint up to `hi`, which would send `hi` left; fall back to `lo`.
fn split_point(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi {
        lo
    } else {
        mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    fn settings(n_estimators: usize) -> BoostingSettings {
        BoostingSettings {
            n_estimators,
            ..BoostingSettings::default()
        }
    }

    #[test]
    fn test_regressor_reduces_error() {
        let x = Array::from_shape_fn((50, 2), |(i, j)| (i as f64) * (j as f64 + 1.0) / 10.0);
        let y = x.column(0).mapv(|v| v * v);

        let mut model = GradientBoosting::new(&settings(50));
        model.fit_regression(x.view(), y.view()).unwrap();
        assert_eq!(model.n_trees(), 50);

        let predictions = model.predict_margin(x.view()).unwrap();
        let mse = (&predictions - &y).mapv(|e| e * e).mean().unwrap();
        let variance = y.var(0.0);
        assert!(mse < variance * 0.05, "mse {mse} vs variance {variance}");
    }

    #[test]
    fn test_adjacent_floats_split_apart() {
        // Odd mantissa, so the midpoint rounds up to `hi`
        let lo = f64::from_bits(1.0f64.to_bits() + 1);
        let hi = f64::from_bits(lo.to_bits() + 1);
        assert_eq!(split_point(lo, hi), lo);
        assert_eq!(split_point(1.0, 3.0), 2.0);

        let x = array![[lo], [lo], [hi], [hi]];
        let y = array![0.0, 0.0, 10.0, 10.0];
        let mut model = GradientBoosting::new(&settings(10));
        model.fit_regression(x.view(), y.view()).unwrap();

        let predictions = model.predict_margin(array![[lo], [hi]].view()).unwrap();
        assert!(predictions[1] - predictions[0] > 5.0, "{predictions}");
    }

    #[test]
    fn test_single_round_without_split_predicts_mean() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = GradientBoosting::new(&settings(1));
        model.fit_regression(x.view(), y.view()).unwrap();

        // Residuals sum to zero around the base score, so the leaf weight is 0
        let predictions = model.predict_margin(array![[1.0]].view()).unwrap();
        assert!((predictions[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_classifier_probabilities() {
        let x = Array::from_shape_fn((40, 1), |(i, _)| i as f64);
        let y: Vec<usize> = (0..40).map(|i| usize::from(i >= 20)).collect();

        let mut model = GradientBoosting::new(&settings(20));
        ClassificationModel::fit(&mut model, x.view(), &y, 2).unwrap();
        assert_eq!(model.objective(), Objective::Logistic);

        let proba = model.predict_proba(array![[2.0], [37.0]].view()).unwrap();
        assert!(proba[[0, 1]] < 0.5);
        assert!(proba[[1, 1]] > 0.5);
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }

        let labels = ClassificationModel::predict(&model, x.view()).unwrap();
        assert_eq!(labels, y);
    }

    #[test]
    fn test_rejects_multiclass() {
        let mut model = GradientBoosting::new(&settings(5));
        let result = ClassificationModel::fit(&mut model, array![[0.0], [1.0], [2.0]].view(), &[0, 1, 2], 3);
        assert!(matches!(result, Err(TeburuError::Fit { .. })));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = GradientBoosting::new(&settings(5));
        assert!(matches!(
            model.predict_margin(array![[1.0]].view()),
            Err(TeburuError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_regression_model_has_no_probabilities() {
        let mut model = GradientBoosting::new(&settings(2));
        model.fit_regression(array![[0.0], [1.0]].view(), array![0.0, 1.0].view()).unwrap();
        assert!(model.predict_proba(array![[0.0]].view()).is_err());
    }
}
