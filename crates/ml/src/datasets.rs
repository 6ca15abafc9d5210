//! Seeded synthetic datasets for demos and tests.
//!
//! `diabetes_like` and `breast_cancer_like` mirror the shapes of the two
//! classic toy tables (442 × 10 regression, 569 × 30 binary classification)
//! without shipping their data.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use teburu_models::{Dataset, Result, TeburuError};

const DIABETES_SAMPLES: usize = 442;
const DIABETES_FEATURES: usize = 10;
const BREAST_CANCER_SAMPLES: usize = 569;
const BREAST_CANCER_FEATURES: usize = 30;

/// Standard-normal features with a linear target plus gaussian noise.
///
/// The intercept sits near 152 and the coefficients in ±40, so RMSE values
/// land on the same scale as the diabetes table.
pub fn make_regression(n_samples: usize, n_features: usize, noise: f64, seed: u64) -> Result<Dataset> {
    let noise_dist = Normal::new(0.0, noise)
        .map_err(|e| TeburuError::InvalidConfig(format!("noise must be a finite non-negative value: {e}")))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let coefficients: Vec<f64> = (0..n_features).map(|_| rng.gen_range(-40.0..40.0)).collect();
    let features = standard_normal(&mut rng, n_samples, n_features);
    let targets: Array1<f64> = features
        .rows()
        .into_iter()
        .map(|row| {
            let signal: f64 = row.iter().zip(&coefficients).map(|(x, c)| x * c).sum();
            152.0 + signal + noise_dist.sample(&mut rng)
        })
        .collect();

    Dataset::new(features, targets)
}

/// Standard-normal features and a 0/1 label drawn from a logistic link on a
/// linear score.
pub fn make_classification(n_samples: usize, n_features: usize, seed: u64) -> Result<Dataset> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let coefficients: Vec<f64> = (0..n_features).map(|_| rng.gen_range(-2.0..2.0)).collect();
    let features = standard_normal(&mut rng, n_samples, n_features);
    let targets: Array1<f64> = features
        .rows()
        .into_iter()
        .map(|row| {
            let score: f64 = row.iter().zip(&coefficients).map(|(x, c)| x * c).sum();
            let p = 1.0 / (1.0 + (-score).exp());
            if rng.gen::<f64>() < p { 1.0 } else { 0.0 }
        })
        .collect();

    Dataset::new(features, targets)
}

pub fn diabetes_like(seed: u64) -> Result<Dataset> {
    make_regression(DIABETES_SAMPLES, DIABETES_FEATURES, 50.0, seed)
}

pub fn breast_cancer_like(seed: u64) -> Result<Dataset> {
    make_classification(BREAST_CANCER_SAMPLES, BREAST_CANCER_FEATURES, seed)
}

fn standard_normal(rng: &mut ChaCha8Rng, n_samples: usize, n_features: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_samples, n_features), |_| StandardNormal.sample(rng))
}
