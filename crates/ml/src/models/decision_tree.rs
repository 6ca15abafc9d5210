//! Single decision tree backed by smartcore

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{DecisionTreeClassifier, DecisionTreeClassifierParameters};
use smartcore::tree::decision_tree_regressor::{DecisionTreeRegressor, DecisionTreeRegressorParameters};
use teburu_models::{Result, TeburuError, TreeSettings};

use super::{check_input, check_width, class_labels, dense_matrix, depth_limit, ClassificationModel, RegressionModel};

type TreeRegressor = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type TreeClassifier = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

enum FittedTree {
    Regressor(TreeRegressor),
    Classifier { tree: TreeClassifier, n_classes: usize },
}

/// Decision tree model
///
/// Fitting mode follows the entry point: [`DecisionTree::fit_regression`]
/// grows a variance-reduction tree, [`DecisionTree::fit_classification`] a
/// Gini tree.
pub struct DecisionTree {
    fitted: Option<FittedTree>,
    /// Maximum depth, unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(settings: &TreeSettings) -> Self {
        Self {
            fitted: None,
            max_depth: settings.max_depth,
            min_samples_split: settings.min_samples_split,
            min_samples_leaf: settings.min_samples_leaf,
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn is_classifier(&self) -> bool {
        matches!(self.fitted, Some(FittedTree::Classifier { .. }))
    }

    fn regressor_parameters(&self) -> DecisionTreeRegressorParameters {
        let mut params = DecisionTreeRegressorParameters::default();
        params.max_depth = self.max_depth.map(depth_limit);
        params.min_samples_split = self.min_samples_split;
        params.min_samples_leaf = self.min_samples_leaf;
        params
    }

    fn classifier_parameters(&self) -> DecisionTreeClassifierParameters {
        let mut params = DecisionTreeClassifierParameters::default();
        params.max_depth = self.max_depth.map(depth_limit);
        params.min_samples_split = self.min_samples_split;
        params.min_samples_leaf = self.min_samples_leaf;
        params
    }

    pub fn fit_regression(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        check_input(x, y.len())?;
        let matrix = dense_matrix(x)?;
        let tree = TreeRegressor::fit(&matrix, &y.to_vec(), self.regressor_parameters())
            .map_err(|e| TeburuError::fit("decision_tree", e))?;

        self.n_features = x.ncols();
        self.fitted = Some(FittedTree::Regressor(tree));
        Ok(())
    }

    pub fn fit_classification(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()> {
        check_input(x, y.len())?;
        let labels = class_labels(y, n_classes)?;
        let matrix = dense_matrix(x)?;
        let tree = TreeClassifier::fit(&matrix, &labels, self.classifier_parameters())
            .map_err(|e| TeburuError::fit("decision_tree", e))?;

        self.n_features = x.ncols();
        self.fitted = Some(FittedTree::Classifier { tree, n_classes });
        Ok(())
    }

    fn fitted(&self, x: ArrayView2<'_, f64>) -> Result<(&FittedTree, DenseMatrix<f64>)> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| TeburuError::not_fitted("decision_tree"))?;
        check_width(x, self.n_features)?;
        Ok((fitted, dense_matrix(x)?))
    }

    /// Leaf mean (regression) or predicted class index (classification).
    pub fn predict_values(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let (fitted, matrix) = self.fitted(x)?;
        match fitted {
            FittedTree::Regressor(tree) => tree
                .predict(&matrix)
                .map(Array1::from_vec)
                .map_err(|e| TeburuError::InvalidData(e.to_string())),
            FittedTree::Classifier { tree, .. } => {
                let labels = tree.predict(&matrix).map_err(|e| TeburuError::InvalidData(e.to_string()))?;
                Ok(labels.into_iter().map(f64::from).collect())
            }
        }
    }

    /// Class distribution of the leaf each row lands in.
    ///
    /// smartcore reports the leaf's majority class only, so rows get a
    /// one-hot distribution. With the default growth limits every leaf is
    /// pure and this is the exact leaf distribution.
    pub fn class_probabilities(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let (fitted, matrix) = self.fitted(x)?;
        let FittedTree::Classifier { tree, n_classes } = fitted else {
            return Err(TeburuError::InvalidData(
                "class probabilities need a classification tree".to_string(),
            ));
        };

        let labels = tree.predict(&matrix).map_err(|e| TeburuError::InvalidData(e.to_string()))?;
        let mut proba = Array2::zeros((x.nrows(), *n_classes));
        for (row, &label) in labels.iter().enumerate() {
            proba[[row, label as usize]] = 1.0;
        }
        Ok(proba)
    }
}

impl RegressionModel for DecisionTree {
    fn model_name(&self) -> &str {
        "decision_tree"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        self.fit_regression(x, y)
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.predict_values(x)
    }
}

impl ClassificationModel for DecisionTree {
    fn model_name(&self) -> &str {
        "decision_tree"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()> {
        self.fit_classification(x, y, n_classes)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.class_probabilities(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    #[test]
    fn test_classifier_simple() {
        let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let y = [0, 0, 1, 1];

        let mut tree = DecisionTree::new(&TreeSettings::default());
        tree.fit_classification(x.view(), &y, 2).unwrap();

        let predictions = tree.predict_values(x.view()).unwrap();
        assert_eq!(predictions, array![0.0, 0.0, 1.0, 1.0]);
        assert!(tree.is_classifier());
    }

    #[test]
    fn test_regressor_fits_training_data() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        let mut tree = DecisionTree::new(&TreeSettings::default());
        tree.fit_regression(x.view(), y.view()).unwrap();

        // Unlimited depth memorises distinct rows
        let predictions = tree.predict_values(x.view()).unwrap();
        assert_eq!(predictions, y);
        assert!(!tree.is_classifier());
    }

    #[test]
    fn test_max_depth() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![1.0, 5.0, 2.0, 8.0];

        let mut tree = DecisionTree::new(&TreeSettings::default()).with_max_depth(1);
        tree.fit_regression(x.view(), y.view()).unwrap();

        // A single split leaves at most two distinct outputs
        let mut predictions = tree.predict_values(x.view()).unwrap().to_vec();
        predictions.sort_by(f64::total_cmp);
        predictions.dedup();
        assert!(predictions.len() <= 2, "{predictions:?}");
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = array![0.0, 0.0, 0.0, 10.0, 10.0, 10.0];

        let settings = TreeSettings {
            min_samples_leaf: 3,
            ..TreeSettings::default()
        };
        let mut tree = DecisionTree::new(&settings);
        tree.fit_regression(x.view(), y.view()).unwrap();

        let predictions = tree.predict_values(array![[2.5], [5.5]].view()).unwrap();
        assert_eq!(predictions, array![0.0, 10.0]);
    }

    #[test]
    fn test_class_probabilities() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = [0, 0, 1, 1];

        let mut tree = DecisionTree::new(&TreeSettings::default());
        tree.fit_classification(x.view(), &y, 2).unwrap();

        let proba = tree.class_probabilities(array![[0.5], [2.5]].view()).unwrap();
        assert_eq!(proba, array![[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_constant_target() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];

        let mut tree = DecisionTree::new(&TreeSettings::default());
        tree.fit_regression(x.view(), y.view()).unwrap();
        assert_eq!(tree.predict_values(x.view()).unwrap(), y);
    }

    #[test]
    fn test_deep_monotone_target_fits() {
        // Each best split peels one row off the top, so an unlimited tree
        // is about as deep as the data is long.
        let n = 4000;
        let x = Array::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = Array::from_shape_fn(n, |i| 1.085f64.powi(i as i32));

        let mut tree = DecisionTree::new(&TreeSettings::default());
        tree.fit_regression(x.view(), y.view()).unwrap();

        let predictions = tree.predict_values(x.view()).unwrap();
        assert_eq!(predictions.len(), n);
        assert!(predictions.iter().all(|p| p.is_finite()));
        assert!(predictions[n - 1] > predictions[0]);
    }

    #[test]
    fn test_unfitted_and_shape_errors() {
        let tree = DecisionTree::new(&TreeSettings::default());
        assert!(matches!(
            tree.predict_values(array![[1.0]].view()),
            Err(TeburuError::NotFitted { .. })
        ));

        let mut tree = DecisionTree::new(&TreeSettings::default());
        tree.fit_regression(array![[1.0], [2.0]].view(), array![1.0, 2.0].view()).unwrap();
        assert!(matches!(
            tree.predict_values(array![[1.0, 2.0]].view()),
            Err(TeburuError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            tree.class_probabilities(array![[1.0]].view()),
            Err(TeburuError::InvalidData(_))
        ));
    }

    #[test]
    fn test_out_of_range_class() {
        let mut tree = DecisionTree::new(&TreeSettings::default());
        let result = tree.fit_classification(array![[1.0], [2.0]].view(), &[0, 2], 2);
        assert!(matches!(result, Err(TeburuError::InvalidData(_))));
    }
}
