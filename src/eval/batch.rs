// ============================================================
// Batch Metrics
// ============================================================
// One-shot statistics over complete label / prediction slices:
// accuracy, micro-averaged precision / recall / F1, and AUC.
//
// Micro averaging aggregates true/false positives and
// negatives across all classes before taking the ratio, so it
// handles multi-class inputs; AUC treats the predictions as
// binary scores (positive class = 1).
//
// Unlike the streaming set, nothing here accumulates — each
// call computes the whole report from the slices it is given.

use std::collections::{BTreeMap, BTreeSet};

/// Full one-shot metric report, keyed by metric name:
/// `accuracy`, `precision`, `recall`, `f1`, `auc`.
///
/// Slices must have equal length.
pub fn create_eval_batch(labels: &[i64], predictions: &[i64]) -> BTreeMap<&'static str, f64> {
    assert_eq!(
        labels.len(),
        predictions.len(),
        "labels and predictions must have same length"
    );

    let accuracy = accuracy(labels, predictions);
    let (precision, recall, f1) = micro_prf(labels, predictions);
    let auc = binary_auc(labels, predictions);

    BTreeMap::from([
        ("accuracy", accuracy),
        ("precision", precision),
        ("recall", recall),
        ("f1", f1),
        ("auc", auc),
    ])
}

/// Fraction of exact matches.
fn accuracy(labels: &[i64], predictions: &[i64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = labels
        .iter()
        .zip(predictions.iter())
        .filter(|(l, p)| l == p)
        .count();
    correct as f64 / labels.len() as f64
}

/// Micro-averaged precision, recall and F1.
///
/// Confusion counts are summed over every class seen in either
/// slice, then the ratios are taken once from the global sums.
fn micro_prf(labels: &[i64], predictions: &[i64]) -> (f64, f64, f64) {
    let classes: BTreeSet<i64> = labels.iter().chain(predictions.iter()).copied().collect();

    let mut tp: usize = 0;
    let mut fp: usize = 0;
    let mut fn_count: usize = 0;

    for &class in &classes {
        for (&label, &pred) in labels.iter().zip(predictions.iter()) {
            match (pred == class, label == class) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fn_count += 1,
                _ => {}
            }
        }
    }

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };

    let recall = if tp + fn_count > 0 {
        tp as f64 / (tp + fn_count) as f64
    } else {
        0.0
    };

    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    (precision, recall, f1)
}

/// Binary ROC AUC via the rank statistic: the probability that a
/// random positive outscores a random negative, ties at half
/// weight. Returns 0.0 when either class is absent.
fn binary_auc(labels: &[i64], predictions: &[i64]) -> f64 {
    let positives: Vec<f64> = labels
        .iter()
        .zip(predictions.iter())
        .filter(|(&l, _)| l == 1)
        .map(|(_, &p)| p as f64)
        .collect();
    let negatives: Vec<f64> = labels
        .iter()
        .zip(predictions.iter())
        .filter(|(&l, _)| l != 1)
        .map(|(_, &p)| p as f64)
        .collect();

    if positives.is_empty() || negatives.is_empty() {
        return 0.0;
    }

    let mut rank_sum = 0.0;
    for &pos in &positives {
        for &neg in &negatives {
            if pos > neg {
                rank_sum += 1.0;
            } else if pos == neg {
                rank_sum += 0.5;
            }
        }
    }
    rank_sum / (positives.len() * negatives.len()) as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let report = create_eval_batch(&[0, 1, 1, 0], &[0, 1, 1, 0]);

        assert!((report["accuracy"] - 1.0).abs() < 1e-9);
        assert!((report["precision"] - 1.0).abs() < 1e-9);
        assert!((report["recall"] - 1.0).abs() < 1e-9);
        assert!((report["f1"] - 1.0).abs() < 1e-9);
        assert!((report["auc"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_missed_positive() {
        let report = create_eval_batch(&[0, 1, 1, 0], &[0, 1, 0, 0]);

        assert!((report["accuracy"] - 0.75).abs() < 1e-9);
        // Micro averaging over both classes: 3 global tp, 1 fp, 1 fn
        assert!((report["precision"] - 0.75).abs() < 1e-9);
        assert!((report["recall"] - 0.75).abs() < 1e-9);
        assert!((report["f1"] - 0.75).abs() < 1e-9);
        // Positive scores {1, 0} vs negative scores {0, 0}
        assert!((report["auc"] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_multiclass_micro_equals_accuracy() {
        // Single-label multi-class: micro precision/recall/f1 all
        // collapse to accuracy
        let labels = [0, 1, 2, 2, 1, 0];
        let predictions = [0, 2, 2, 2, 1, 1];
        let report = create_eval_batch(&labels, &predictions);

        let expected = 4.0 / 6.0;
        assert!((report["accuracy"] - expected).abs() < 1e-9);
        assert!((report["precision"] - expected).abs() < 1e-9);
        assert!((report["recall"] - expected).abs() < 1e-9);
        assert!((report["f1"] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_auc_without_positives_is_zero() {
        let report = create_eval_batch(&[0, 0, 0], &[0, 1, 0]);
        assert_eq!(report["auc"], 0.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics() {
        create_eval_batch(&[0, 1], &[0]);
    }
}
