use serde::{Deserialize, Serialize};
use crate::error::{TeburuError, Result};
use crate::split::SplitConfig;

/// Fixed hyperparameters for the canned model panel.
///
/// There is no search over these; the defaults match the usual library
/// defaults for each model family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub split: SplitConfig,
    pub tree: TreeSettings,
    pub forest: ForestSettings,
    pub boosting: BoostingSettings,
    pub logistic: LogisticSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Unlimited depth when `None`
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestSettings {
    pub n_estimators: usize,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self { n_estimators: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingSettings {
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's leaf weights
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 penalty on leaf weights
    pub reg_lambda: f64,
    /// Minimum hessian sum allowed in a child
    pub min_child_weight: f64,
}

impl Default for BoostingSettings {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.3,
            max_depth: 6,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticSettings {
    /// L2 penalty strength
    pub alpha: f64,
    pub max_iterations: u64,
}

impl Default for LogisticSettings {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iterations: 100,
        }
    }
}

impl ModelSettings {
    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.split.validate()?;

        if self.tree.min_samples_split < 2 {
            return Err(invalid("tree.min_samples_split must be at least 2"));
        }
        if self.tree.min_samples_leaf == 0 {
            return Err(invalid("tree.min_samples_leaf must be at least 1"));
        }
        if self.tree.max_depth == Some(0) {
            return Err(invalid("tree.max_depth must be positive"));
        }
        if self.forest.n_estimators == 0 {
            return Err(invalid("forest.n_estimators must be positive"));
        }
        if self.boosting.n_estimators == 0 {
            return Err(invalid("boosting.n_estimators must be positive"));
        }
        if !(self.boosting.learning_rate > 0.0) {
            return Err(invalid("boosting.learning_rate must be positive"));
        }
        if self.boosting.max_depth == 0 {
            return Err(invalid("boosting.max_depth must be positive"));
        }
        if self.boosting.reg_lambda < 0.0 || self.boosting.min_child_weight < 0.0 {
            return Err(invalid("boosting regularisation terms must be non-negative"));
        }
        if self.logistic.alpha < 0.0 {
            return Err(invalid("logistic.alpha must be non-negative"));
        }
        if self.logistic.max_iterations == 0 {
            return Err(invalid("logistic.max_iterations must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> TeburuError {
    TeburuError::InvalidConfig(msg.to_string())
}
