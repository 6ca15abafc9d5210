//! Random forest backed by smartcore

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use smartcore::ensemble::random_forest_classifier::{RandomForestClassifier, RandomForestClassifierParameters};
use smartcore::ensemble::random_forest_regressor::{RandomForestRegressor, RandomForestRegressorParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;
use teburu_models::{ModelSettings, Result, TeburuError, TreeSettings};
use tracing::debug;

use super::{
    argmax, check_input, check_width, class_labels, dense_matrix, depth_limit, ClassificationModel, RegressionModel,
};

type ForestRegressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type ForestClassifier = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Strategy for max features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFeatures {
    /// Square root of n_features, rounded down
    Sqrt,
    /// All features
    All,
}

enum FittedForest {
    Regressor(ForestRegressor),
    /// One single-tree forest per estimator. smartcore's classifier only
    /// reports the majority label, so the votes are tallied here.
    Classifier {
        members: Vec<ForestClassifier>,
        n_classes: usize,
    },
}

/// Bagged ensemble of decision trees.
pub struct RandomForest {
    fitted: Option<FittedForest>,
    /// Number of trees
    pub n_estimators: usize,
    /// Features considered at each split
    pub max_features: MaxFeatures,
    /// Growth limits shared by every tree
    pub tree_settings: TreeSettings,
    /// Random state
    pub random_state: u64,
    n_features: usize,
}

impl RandomForest {
    /// Regression forests consider every feature at each split.
    pub fn new_regressor(settings: &ModelSettings) -> Self {
        Self::with_strategy(settings, MaxFeatures::All)
    }

    /// Classification forests consider `floor(sqrt(n_features))` features.
    pub fn new_classifier(settings: &ModelSettings) -> Self {
        Self::with_strategy(settings, MaxFeatures::Sqrt)
    }

    fn with_strategy(settings: &ModelSettings, max_features: MaxFeatures) -> Self {
        Self {
            fitted: None,
            n_estimators: settings.forest.n_estimators,
            max_features,
            tree_settings: settings.tree.clone(),
            random_state: settings.split.seed,
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        match &self.fitted {
            None => 0,
            Some(FittedForest::Regressor(_)) => self.n_estimators,
            Some(FittedForest::Classifier { members, .. }) => members.len(),
        }
    }

    fn compute_max_features(&self, n_features: usize) -> usize {
        match self.max_features {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
        }
        .max(1)
    }

    fn check_estimators(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(TeburuError::InvalidConfig("forest needs at least one tree".to_string()));
        }
        Ok(())
    }

    fn regressor_parameters(&self, max_features: usize) -> Result<RandomForestRegressorParameters> {
        let mut params = RandomForestRegressorParameters::default();
        params.n_trees = self
            .n_estimators
            .try_into()
            .map_err(|_| TeburuError::InvalidConfig(format!("{} trees is too many", self.n_estimators)))?;
        params.m = Some(max_features);
        params.max_depth = self.tree_settings.max_depth.map(depth_limit);
        params.min_samples_split = self.tree_settings.min_samples_split;
        params.min_samples_leaf = self.tree_settings.min_samples_leaf;
        params.seed = self.random_state;
        Ok(params)
    }

    fn member_parameters(&self, max_features: usize, seed: u64) -> RandomForestClassifierParameters {
        let mut params = RandomForestClassifierParameters::default();
        params.n_trees = 1;
        params.m = Some(max_features);
        params.max_depth = self.tree_settings.max_depth.map(depth_limit);
        params.min_samples_split = self.tree_settings.min_samples_split;
        params.min_samples_leaf = self.tree_settings.min_samples_leaf;
        params.seed = seed;
        params
    }

    pub fn fit_regression(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        check_input(x, y.len())?;
        self.check_estimators()?;
        let max_features = self.compute_max_features(x.ncols());
        let matrix = dense_matrix(x)?;

        let forest = ForestRegressor::fit(&matrix, &y.to_vec(), self.regressor_parameters(max_features)?)
            .map_err(|e| TeburuError::fit("random_forest", e))?;

        self.n_features = x.ncols();
        self.fitted = Some(FittedForest::Regressor(forest));
        debug!(n_trees = self.n_estimators, max_features, "random forest fitted");
        Ok(())
    }

    pub fn fit_classification(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()> {
        check_input(x, y.len())?;
        self.check_estimators()?;
        let labels = class_labels(y, n_classes)?;
        let max_features = self.compute_max_features(x.ncols());
        let matrix = dense_matrix(x)?;

        // Member seeds follow `seed + tree index`
        let members = (0..self.n_estimators)
            .map(|idx| {
                let seed = self.random_state.wrapping_add(idx as u64);
                ForestClassifier::fit(&matrix, &labels, self.member_parameters(max_features, seed))
                    .map_err(|e| TeburuError::fit("random_forest", e))
            })
            .collect::<Result<Vec<_>>>()?;

        self.n_features = x.ncols();
        self.fitted = Some(FittedForest::Classifier { members, n_classes });
        debug!(n_trees = self.n_estimators, max_features, n_classes, "random forest fitted");
        Ok(())
    }

    fn fitted(&self, x: ArrayView2<'_, f64>) -> Result<(&FittedForest, DenseMatrix<f64>)> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| TeburuError::not_fitted("random_forest"))?;
        check_width(x, self.n_features)?;
        Ok((fitted, dense_matrix(x)?))
    }

    /// Average of the tree outputs (regression) or the majority class index
    /// (classification).
    pub fn predict_values(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let (fitted, matrix) = self.fitted(x)?;
        match fitted {
            FittedForest::Regressor(forest) => forest
                .predict(&matrix)
                .map(Array1::from_vec)
                .map_err(|e| TeburuError::InvalidData(e.to_string())),
            FittedForest::Classifier { members, n_classes } => {
                let proba = vote_shares(members, *n_classes, &matrix)?;
                Ok(proba.rows().into_iter().map(|row| argmax(row) as f64).collect())
            }
        }
    }

    /// Share of trees voting for each class.
    pub fn class_probabilities(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let (fitted, matrix) = self.fitted(x)?;
        let FittedForest::Classifier { members, n_classes } = fitted else {
            return Err(TeburuError::InvalidData(
                "class probabilities need a classification forest".to_string(),
            ));
        };

        vote_shares(members, *n_classes, &matrix)
    }
}

fn vote_shares(members: &[ForestClassifier], n_classes: usize, matrix: &DenseMatrix<f64>) -> Result<Array2<f64>> {
    let mut votes: Option<Array2<f64>> = None;
    for member in members {
        let labels = member.predict(matrix).map_err(|e| TeburuError::InvalidData(e.to_string()))?;
        let tally = votes.get_or_insert_with(|| Array2::zeros((labels.len(), n_classes)));
        for (row, &label) in labels.iter().enumerate() {
            tally[[row, label as usize]] += 1.0;
        }
    }
    let votes = votes.ok_or_else(|| TeburuError::not_fitted("random_forest"))?;
    Ok(votes / members.len() as f64)
}

impl RegressionModel for RandomForest {
    fn model_name(&self) -> &str {
        "random_forest"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        self.fit_regression(x, y)
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.predict_values(x)
    }
}

impl ClassificationModel for RandomForest {
    fn model_name(&self) -> &str {
        "random_forest"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[usize], n_classes: usize) -> Result<()> {
        self.fit_classification(x, y, n_classes)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.class_probabilities(x)
    }
}
