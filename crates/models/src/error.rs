use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeburuError {
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Dataset has no {0}")]
    EmptyDataset(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Model {model} is not fitted; call train() first")]
    NotFitted { model: String },

    #[error("Fitting {model} failed: {reason}")]
    Fit { model: String, reason: String },

    #[error("Metric {metric} is undefined: {reason}")]
    UndefinedMetric { metric: &'static str, reason: String },

    #[error("Data frame error: {0}")]
    Frame(String),
}

impl TeburuError {
    pub fn fit(model: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fit {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_fitted(model: impl Into<String>) -> Self {
        Self::NotFitted { model: model.into() }
    }
}

pub type Result<T> = std::result::Result<T, TeburuError>;
