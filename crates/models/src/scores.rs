use serde::{Deserialize, Serialize};

/// One row of a regression comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionScore {
    pub model: String,
    pub rmse: f64,
}

/// One row of a classification comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationScore {
    pub model: String,
    pub accuracy: f64,
    pub auc: f64,
}

impl RegressionScore {
    pub fn new(model: impl Into<String>, rmse: f64) -> Self {
        Self {
            model: model.into(),
            rmse,
        }
    }
}

impl ClassificationScore {
    pub fn new(model: impl Into<String>, accuracy: f64, auc: f64) -> Self {
        Self {
            model: model.into(),
            accuracy,
            auc,
        }
    }

    /// AUC of 0.5 is a coin flip.
    pub fn beats_chance(&self) -> bool {
        self.auc > 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_serialization() {
        let score = ClassificationScore::new("random_forest", 0.95, 0.98);
        let json = serde_json::to_value(&score).unwrap();

        assert_eq!(json["model"], "random_forest");
        assert_eq!(json["accuracy"], 0.95);
        assert_eq!(json["auc"], 0.98);
        assert!(score.beats_chance());
    }

    #[test]
    fn test_regression_score_roundtrip() {
        let score = RegressionScore::new("xgboost", 54.2);
        let text = serde_json::to_string(&score).unwrap();
        let back: RegressionScore = serde_json::from_str(&text).unwrap();
        assert_eq!(back, score);
    }
}
