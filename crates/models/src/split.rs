use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::dataset::Dataset;
use crate::error::{TeburuError, Result};

/// Train/test partition settings.
///
/// The ratio and seed are always explicit; nothing is taken from ambient
/// global random state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows held out for scoring, strictly between 0 and 1.
    pub test_ratio: f64,
    /// Seed for the wrapper's shuffling RNG.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.25,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(TeburuError::InvalidConfig(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }

    /// Number of held-out rows for a dataset of `n_samples` rows.
    pub fn test_size(&self, n_samples: usize) -> Result<usize> {
        self.validate()?;
        let test_size = (n_samples as f64 * self.test_ratio).ceil() as usize;
        if test_size == 0 || test_size >= n_samples {
            return Err(TeburuError::InvalidConfig(format!(
                "test_ratio {} leaves an empty partition for {} rows",
                self.test_ratio, n_samples
            )));
        }
        Ok(test_size)
    }

    /// Shuffle the rows with `rng` and cut off the test partition.
    pub fn split<R: Rng + ?Sized>(&self, dataset: &Dataset, rng: &mut R) -> Result<TrainTestSplit> {
        let n_samples = dataset.n_samples();
        let test_size = self.test_size(n_samples)?;

        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(rng);
        let (test_idx, train_idx) = indices.split_at(test_size);

        let x = dataset.features();
        let y = dataset.targets();
        Ok(TrainTestSplit {
            x_train: x.select(Axis(0), train_idx),
            y_train: y.select(Axis(0), train_idx),
            x_test: x.select(Axis(0), test_idx),
            y_test: y.select(Axis(0), test_idx),
        })
    }
}

impl TrainTestSplit {
    pub fn n_train(&self) -> usize {
        self.y_train.len()
    }

    pub fn n_test(&self) -> usize {
        self.y_test.len()
    }
}
