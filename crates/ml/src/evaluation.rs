//! Scoring metrics
//!
//! Every metric checks that its inputs are non-empty and aligned; a
//! mismatch is an error rather than a NaN or a panic inside the metric
//! crates.

use linfa::prelude::SingleTargetRegression;
use ndarray::ArrayView1;
use smartcore::metrics::accuracy::Accuracy;
use smartcore::metrics::Metrics;
use teburu_models::{Result, TeburuError};

/// Root mean squared error, `sqrt(mean((a - p)²))`. Lower is better.
pub fn rmse(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> Result<f64> {
    check_pair(actual.len(), predicted.len())?;

    let mse = actual
        .mean_squared_error(&predicted)
        .map_err(|e| TeburuError::InvalidData(e.to_string()))?;
    Ok(mse.sqrt())
}

/// Fraction of positions where the predicted label equals the actual one.
pub fn accuracy(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> Result<f64> {
    check_pair(actual.len(), predicted.len())?;

    Ok(Accuracy::<f64>::new().get_score(&actual.to_vec(), &predicted.to_vec()))
}

/// Area under the ROC curve for binary labels.
///
/// Computed as the Mann-Whitney U statistic over the positive-class scores,
/// with tied scores sharing their average rank. Undefined when either class
/// is missing. linfa's ROC works in `f32` and divides by zero on a single
/// class, so this one stays local.
pub fn roc_auc(positive: &[bool], scores: ArrayView1<'_, f64>) -> Result<f64> {
    check_pair(positive.len(), scores.len())?;

    let n_pos = positive.iter().filter(|&&p| p).count();
    let n_neg = positive.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(TeburuError::UndefinedMetric {
            metric: "AUC",
            reason: format!("need both classes, got {n_pos} positive and {n_neg} negative"),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; the tie block [start, end) shares their mean
        let avg_rank = (start + end + 1) as f64 / 2.0;
        let positives_in_block = order[start..end].iter().filter(|&&i| positive[i]).count();
        rank_sum += avg_rank * positives_in_block as f64;
        start = end;
    }

    let n_pos = n_pos as f64;
    let u = rank_sum - n_pos * (n_pos + 1.0) / 2.0;
    Ok(u / (n_pos * n_neg as f64))
}

fn check_pair(n_actual: usize, n_predicted: usize) -> Result<()> {
    if n_actual != n_predicted {
        return Err(TeburuError::ShapeMismatch {
            expected: format!("{n_actual} predictions"),
            actual: format!("{n_predicted} predictions"),
        });
    }
    if n_actual == 0 {
        return Err(TeburuError::EmptyDataset("predictions"));
    }
    Ok(())
}
