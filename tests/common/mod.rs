// Shared fixtures for the integration tests

#![allow(dead_code)]

use ndarray::Array;
use teburu::{Dataset, ModelSettings};

/// Settings with small ensembles so the full panel runs quickly.
pub fn fast_settings() -> ModelSettings {
    let mut settings = ModelSettings::default();
    settings.forest.n_estimators = 15;
    settings.boosting.n_estimators = 20;
    settings
}

/// Noise-free `y = 3*x0 - 2*x1 + 5` over a small grid.
pub fn exact_linear_dataset(n: usize) -> Dataset {
    let x = Array::from_shape_fn((n, 2), |(i, j)| ((i * (2 * j + 3)) % 17) as f64);
    let y = Array::from_shape_fn(n, |i| 3.0 * x[[i, 0]] - 2.0 * x[[i, 1]] + 5.0);
    Dataset::new(x, y).unwrap()
}

/// Three labels 0, 1, 2 cycling over a single feature.
pub fn three_class_dataset(n: usize) -> Dataset {
    let x = Array::from_shape_fn((n, 1), |(i, _)| i as f64);
    let y = Array::from_shape_fn(n, |i| (i % 3) as f64);
    Dataset::new(x, y).unwrap()
}

pub fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
