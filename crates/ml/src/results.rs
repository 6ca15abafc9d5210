//! Panel-wide comparison reports.

use polars::prelude::*;
use teburu_models::{ClassificationScore, Dataset, ModelSettings, RegressionScore, Result};
use tracing::info;

use crate::features::frame_error;
use crate::models::{ClassifierKind, RegressorKind};
use crate::training::{Classifier, Regressor};

/// RMSE of every regression model on a shared dataset.
///
/// Each report builds fresh wrappers from the stored settings, so all four
/// models see the same partition and repeated reports are identical.
pub struct RegressionResults<'a> {
    dataset: &'a Dataset,
    settings: ModelSettings,
    kinds: [RegressorKind; 4],
}

impl<'a> RegressionResults<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            settings: ModelSettings::default(),
            kinds: RegressorKind::ALL,
        }
    }

    pub fn with_settings(dataset: &'a Dataset, settings: ModelSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            dataset,
            settings,
            kinds: RegressorKind::ALL,
        })
    }

    pub fn kinds(&self) -> &[RegressorKind] {
        &self.kinds
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|kind| kind.label()).collect()
    }

    /// One RMSE per model, in label order.
    pub fn report(&self) -> Result<Vec<f64>> {
        self.kinds
            .iter()
            .map(|&kind| {
                let mut regressor = Regressor::with_settings(self.dataset, kind, &self.settings)?;
                let rmse = regressor.score()?;
                info!(model = kind.label(), rmse, "regression model scored");
                Ok(rmse)
            })
            .collect()
    }

    pub fn records(&self) -> Result<Vec<RegressionScore>> {
        let rmses = self.report()?;
        Ok(self
            .labels()
            .into_iter()
            .zip(rmses)
            .map(|(label, rmse)| RegressionScore::new(label, rmse))
            .collect())
    }

    /// Table with columns `models` and `RMSE`.
    pub fn df_report(&self) -> Result<DataFrame> {
        let rmses = self.report()?;
        DataFrame::new(vec![
            Series::new("models".into(), self.labels()).into(),
            Series::new("RMSE".into(), rmses).into(),
        ])
        .map_err(frame_error)
    }
}

/// Accuracy and AUC of every classification model on a shared dataset.
pub struct ClassificationResults<'a> {
    dataset: &'a Dataset,
    settings: ModelSettings,
    kinds: [ClassifierKind; 4],
}

impl<'a> ClassificationResults<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            settings: ModelSettings::default(),
            kinds: ClassifierKind::ALL,
        }
    }

    pub fn with_settings(dataset: &'a Dataset, settings: ModelSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            dataset,
            settings,
            kinds: ClassifierKind::ALL,
        })
    }

    pub fn kinds(&self) -> &[ClassifierKind] {
        &self.kinds
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|kind| kind.label()).collect()
    }

    /// Accuracies and AUCs, each in label order.
    pub fn report(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut accuracies = Vec::with_capacity(self.kinds.len());
        let mut aucs = Vec::with_capacity(self.kinds.len());

        for &kind in &self.kinds {
            let mut classifier = Classifier::with_settings(self.dataset, kind, &self.settings)?;
            let (accuracy, auc) = classifier.score()?;
            info!(model = kind.label(), accuracy, auc, "classification model scored");
            accuracies.push(accuracy);
            aucs.push(auc);
        }

        Ok((accuracies, aucs))
    }

    pub fn records(&self) -> Result<Vec<ClassificationScore>> {
        let (accuracies, aucs) = self.report()?;
        Ok(self
            .labels()
            .into_iter()
            .zip(accuracies.into_iter().zip(aucs))
            .map(|(label, (accuracy, auc))| ClassificationScore::new(label, accuracy, auc))
            .collect())
    }

    /// Table with columns `models`, `Accuracy` and `AUC`.
    pub fn df_report(&self) -> Result<DataFrame> {
        let (accuracies, aucs) = self.report()?;
        DataFrame::new(vec![
            Series::new("models".into(), self.labels()).into(),
            Series::new("Accuracy".into(), accuracies).into(),
            Series::new("AUC".into(), aucs).into(),
        ])
        .map_err(frame_error)
    }
}
