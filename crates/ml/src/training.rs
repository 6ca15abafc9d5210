//! Single-model wrappers: split, fit, predict, score.
//!
//! A wrapper borrows the caller's [`Dataset`] and owns one model plus the
//! RNG that draws its train/test partitions. Every [`Regressor::train`] or
//! [`Classifier::train`] call draws a *new* partition from that RNG, so two
//! calls on the same wrapper see different splits while two wrappers built
//! with the same seed see the same ones.

use ndarray::{Array1, ArrayView1};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teburu_models::{Dataset, ModelSettings, Result, SplitConfig, TeburuError, TrainTestSplit};
use tracing::{debug, warn};

use crate::evaluation::{accuracy, rmse, roc_auc};
use crate::models::{ClassificationModel, ClassifierKind, RegressionModel, RegressorKind};

pub struct Regressor<'a> {
    dataset: &'a Dataset,
    kind: RegressorKind,
    model: Box<dyn RegressionModel>,
    split_config: SplitConfig,
    rng: ChaCha8Rng,
    split: Option<TrainTestSplit>,
}

impl<'a> Regressor<'a> {
    /// Wrapper with default settings.
    pub fn new(dataset: &'a Dataset, kind: RegressorKind) -> Self {
        let settings = ModelSettings::default();
        Self::build(dataset, kind, &settings)
    }

    pub fn with_settings(dataset: &'a Dataset, kind: RegressorKind, settings: &ModelSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(dataset, kind, settings))
    }

    fn build(dataset: &'a Dataset, kind: RegressorKind, settings: &ModelSettings) -> Self {
        Self {
            dataset,
            kind,
            model: kind.build(settings),
            split_config: settings.split,
            rng: ChaCha8Rng::seed_from_u64(settings.split.seed),
            split: None,
        }
    }

    pub fn kind(&self) -> RegressorKind {
        self.kind
    }

    pub fn is_trained(&self) -> bool {
        self.split.is_some()
    }

    /// Held-out partition from the latest `train()` call.
    pub fn test_split(&self) -> Option<&TrainTestSplit> {
        self.split.as_ref()
    }

    /// Draw a fresh partition and fit the model on its training rows.
    pub fn train(&mut self) -> Result<()> {
        let split = self.split_config.split(self.dataset, &mut self.rng)?;
        debug!(
            model = self.kind.label(),
            n_train = split.n_train(),
            n_test = split.n_test(),
            "split drawn"
        );

        self.model.fit(split.x_train.view(), split.y_train.view())?;
        self.split = Some(split);
        Ok(())
    }

    /// Predictions for the held-out rows.
    pub fn predict(&self) -> Result<Array1<f64>> {
        let split = self.trained_split()?;
        self.model.predict(split.x_test.view())
    }

    /// RMSE of the current model on the held-out rows.
    pub fn rmse(&self) -> Result<f64> {
        let split = self.trained_split()?;
        let predicted = self.model.predict(split.x_test.view())?;
        rmse(split.y_test.view(), predicted.view())
    }

    /// `train()`, then RMSE on the new held-out rows.
    pub fn score(&mut self) -> Result<f64> {
        self.train()?;
        self.rmse()
    }

    fn trained_split(&self) -> Result<&TrainTestSplit> {
        self.split
            .as_ref()
            .ok_or_else(|| TeburuError::not_fitted(self.model.model_name()))
    }
}

/// Class-label wrapper. Targets are mapped to indices into the sorted
/// distinct target values of the whole dataset.
pub struct Classifier<'a> {
    dataset: &'a Dataset,
    kind: ClassifierKind,
    model: Box<dyn ClassificationModel>,
    classes: Vec<f64>,
    split_config: SplitConfig,
    rng: ChaCha8Rng,
    split: Option<TrainTestSplit>,
}

impl<'a> Classifier<'a> {
    pub fn new(dataset: &'a Dataset, kind: ClassifierKind) -> Self {
        let settings = ModelSettings::default();
        Self::build(dataset, kind, &settings)
    }

    pub fn with_settings(dataset: &'a Dataset, kind: ClassifierKind, settings: &ModelSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(dataset, kind, settings))
    }

    fn build(dataset: &'a Dataset, kind: ClassifierKind, settings: &ModelSettings) -> Self {
        Self {
            dataset,
            kind,
            model: kind.build(settings),
            classes: dataset.classes(),
            split_config: settings.split,
            rng: ChaCha8Rng::seed_from_u64(settings.split.seed),
            split: None,
        }
    }

    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    /// Sorted distinct target values.
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn is_trained(&self) -> bool {
        self.split.is_some()
    }

    pub fn test_split(&self) -> Option<&TrainTestSplit> {
        self.split.as_ref()
    }

    pub fn train(&mut self) -> Result<()> {
        let split = self.split_config.split(self.dataset, &mut self.rng)?;
        debug!(
            model = self.kind.label(),
            n_train = split.n_train(),
            n_test = split.n_test(),
            n_classes = self.classes.len(),
            "split drawn"
        );

        let encoded = self.encode(split.y_train.view())?;
        self.model.fit(split.x_train.view(), &encoded, self.classes.len())?;
        self.split = Some(split);
        Ok(())
    }

    /// Predicted labels for the held-out rows, in the original target values.
    pub fn predict(&self) -> Result<Array1<f64>> {
        let split = self.trained_split()?;
        let indices = self.model.predict(split.x_test.view())?;
        Ok(indices.into_iter().map(|idx| self.classes[idx]).collect())
    }

    /// Positive-class probability for the held-out rows.
    ///
    /// The positive class is the larger of the two target values. Only
    /// defined for binary targets.
    pub fn predict_proba(&self) -> Result<Array1<f64>> {
        let split = self.trained_split()?;
        if self.classes.len() != 2 {
            warn!(
                model = self.kind.label(),
                n_classes = self.classes.len(),
                "positive-class probability needs a binary target"
            );
            return Err(TeburuError::UndefinedMetric {
                metric: "AUC",
                reason: format!("binary target required, got {} classes", self.classes.len()),
            });
        }
        let proba = self.model.predict_proba(split.x_test.view())?;
        Ok(proba.column(1).to_owned())
    }

    pub fn accuracy(&self) -> Result<f64> {
        let split = self.trained_split()?;
        let predicted = self.predict()?;
        accuracy(split.y_test.view(), predicted.view())
    }

    pub fn auc(&self) -> Result<f64> {
        let split = self.trained_split()?;
        let scores = self.predict_proba()?;
        let positive_label = self.classes[1];
        let positive: Vec<bool> = split.y_test.iter().map(|&y| y == positive_label).collect();

        roc_auc(&positive, scores.view()).inspect_err(|err| {
            warn!(model = self.kind.label(), error = %err, "AUC undefined on this split");
        })
    }

    /// `train()`, then `(accuracy, auc)` on the new held-out rows.
    pub fn score(&mut self) -> Result<(f64, f64)> {
        self.train()?;
        Ok((self.accuracy()?, self.auc()?))
    }

    fn encode(&self, targets: ArrayView1<'_, f64>) -> Result<Vec<usize>> {
        targets
            .iter()
            .map(|y| {
                self.classes
                    .binary_search_by(|class| class.total_cmp(y))
                    .map_err(|_| TeburuError::InvalidData(format!("unknown class label {y}")))
            })
            .collect()
    }

    fn trained_split(&self) -> Result<&TrainTestSplit> {
        self.split
            .as_ref()
            .ok_or_else(|| TeburuError::not_fitted(self.model.model_name()))
    }
}
