// ============================================================
// Streaming Metrics
// ============================================================
// Accumulating metrics: each one keeps running counts that are
// updated batch by batch, and reports its current value on
// demand. This is the (update, value) pairing of streaming
// metric APIs, with the update op replaced by a &mut method.
//
// The factory functions mirror the two metric sets used when
// evaluating the classifier:
//
//   create_eval        — accuracy only, keyed "acc"
//   create_eval_binary — accuracy + micro F1 + AUC, for binary
//                        label/prediction streams; also emits
//                        the accuracy as a scalar summary on
//                        the logging layer
//
// Both seed the returned MetricSet with the given batch;
// further batches can be fed through MetricSet::update.

use std::collections::BTreeMap;

use burn::prelude::*;

/// Threshold count used by the streaming AUC accumulator
const AUC_THRESHOLDS: usize = 200;

// ─── StreamingMetric ──────────────────────────────────────────────────────────
/// An accumulating metric over (label, prediction) streams.
///
/// Implementations keep counts across `update` calls; `value`
/// reads the current estimate without consuming the state.
pub trait StreamingMetric {
    /// Key under which this metric appears in a report
    fn name(&self) -> &'static str;

    /// Fold one batch into the running counts.
    /// Slices must have equal length.
    fn update(&mut self, labels: &[i64], predictions: &[i64]);

    /// Current value of the metric
    fn value(&self) -> f64;
}

// ─── StreamingAccuracy ────────────────────────────────────────────────────────
/// Running accuracy: matches / total.
pub struct StreamingAccuracy {
    name:    &'static str,
    correct: u64,
    total:   u64,
}

impl StreamingAccuracy {
    pub fn new(name: &'static str) -> Self {
        Self { name, correct: 0, total: 0 }
    }
}

impl StreamingMetric for StreamingAccuracy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn update(&mut self, labels: &[i64], predictions: &[i64]) {
        assert_eq!(
            labels.len(),
            predictions.len(),
            "labels and predictions must have same length"
        );
        for (&label, &pred) in labels.iter().zip(predictions.iter()) {
            if label == pred {
                self.correct += 1;
            }
            self.total += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64
        } else {
            0.0
        }
    }
}

// ─── StreamingF1 ──────────────────────────────────────────────────────────────
/// Running micro F1 over a binary stream (positive class = 1).
pub struct StreamingF1 {
    tp:       u64,
    fp:       u64,
    fn_count: u64,
}

impl StreamingF1 {
    pub fn new() -> Self {
        Self { tp: 0, fp: 0, fn_count: 0 }
    }
}

impl Default for StreamingF1 {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingMetric for StreamingF1 {
    fn name(&self) -> &'static str {
        "f1"
    }

    fn update(&mut self, labels: &[i64], predictions: &[i64]) {
        assert_eq!(
            labels.len(),
            predictions.len(),
            "labels and predictions must have same length"
        );
        for (&label, &pred) in labels.iter().zip(predictions.iter()) {
            match (pred, label) {
                (1, 1) => self.tp += 1,
                (1, 0) => self.fp += 1,
                (0, 1) => self.fn_count += 1,
                _ => {}
            }
        }
    }

    fn value(&self) -> f64 {
        let denom = 2 * self.tp + self.fp + self.fn_count;
        if denom > 0 {
            2.0 * self.tp as f64 / denom as f64
        } else {
            0.0
        }
    }
}

// ─── StreamingAuc ─────────────────────────────────────────────────────────────
/// Running AUC via per-threshold confusion histograms.
///
/// Keeps tp/fp/tn/fn counts at each of `AUC_THRESHOLDS`
/// thresholds spanning [0, 1] (the endpoints nudged past the
/// range so every sample lands on both extremes), then
/// integrates the ROC curve with the trapezoid rule. Same
/// scheme as the usual streaming-AUC primitive.
pub struct StreamingAuc {
    thresholds: Vec<f64>,
    tp:         Vec<u64>,
    fp:         Vec<u64>,
    tn:         Vec<u64>,
    fn_count:   Vec<u64>,
}

impl StreamingAuc {
    pub fn new() -> Self {
        let n = AUC_THRESHOLDS;
        let eps = 1e-7;
        let mut thresholds: Vec<f64> =
            (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
        // Pin the extremes outside [0, 1] so the ROC curve always
        // reaches (0,0) and (1,1).
        thresholds[0] = -eps;
        thresholds[n - 1] = 1.0 + eps;

        Self {
            thresholds,
            tp: vec![0; n],
            fp: vec![0; n],
            tn: vec![0; n],
            fn_count: vec![0; n],
        }
    }
}

impl Default for StreamingAuc {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingMetric for StreamingAuc {
    fn name(&self) -> &'static str {
        "auc"
    }

    fn update(&mut self, labels: &[i64], predictions: &[i64]) {
        assert_eq!(
            labels.len(),
            predictions.len(),
            "labels and predictions must have same length"
        );
        for (&label, &pred) in labels.iter().zip(predictions.iter()) {
            let score = pred as f64;
            for (i, &t) in self.thresholds.iter().enumerate() {
                match (score > t, label == 1) {
                    (true, true) => self.tp[i] += 1,
                    (true, false) => self.fp[i] += 1,
                    (false, false) => self.tn[i] += 1,
                    (false, true) => self.fn_count[i] += 1,
                }
            }
        }
    }

    fn value(&self) -> f64 {
        let ratio = |num: u64, denom: u64| {
            if denom > 0 { num as f64 / denom as f64 } else { 0.0 }
        };

        // One (fpr, tpr) point per threshold. Thresholds ascend, so
        // the points walk the ROC curve from (1,1) down to (0,0).
        let points: Vec<(f64, f64)> = (0..self.thresholds.len())
            .map(|i| {
                let tpr = ratio(self.tp[i], self.tp[i] + self.fn_count[i]);
                let fpr = ratio(self.fp[i], self.fp[i] + self.tn[i]);
                (fpr, tpr)
            })
            .collect();

        let mut area = 0.0;
        for pair in points.windows(2) {
            let (fpr_hi, tpr_hi) = pair[0];
            let (fpr_lo, tpr_lo) = pair[1];
            area += (fpr_hi - fpr_lo) * (tpr_hi + tpr_lo) / 2.0;
        }
        area
    }
}

// ─── MetricSet ────────────────────────────────────────────────────────────────
/// An ordered collection of streaming metrics updated together.
pub struct MetricSet {
    metrics: Vec<Box<dyn StreamingMetric>>,
}

impl MetricSet {
    fn new(metrics: Vec<Box<dyn StreamingMetric>>) -> Self {
        Self { metrics }
    }

    /// Fold one batch into every metric in the set.
    pub fn update(&mut self, labels: &[i64], predictions: &[i64]) {
        for metric in &mut self.metrics {
            metric.update(labels, predictions);
        }
    }

    /// Current value of every metric, keyed by name.
    pub fn values(&self) -> BTreeMap<&'static str, f64> {
        self.metrics.iter().map(|m| (m.name(), m.value())).collect()
    }

    /// Current value of a single metric, if present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.value())
    }
}

/// Read an integer tensor back into a host-side vector.
fn to_host<B: Backend>(t: Tensor<B, 1, Int>) -> Vec<i64> {
    t.into_data().iter::<i64>().collect()
}

// ─── Factory functions ────────────────────────────────────────────────────────
/// Accuracy-only metric set, seeded with the given batch.
pub fn create_eval<B: Backend>(
    labels:      Tensor<B, 1, Int>,
    predictions: Tensor<B, 1, Int>,
) -> MetricSet {
    let labels = to_host(labels);
    let predictions = to_host(predictions);

    let mut set = MetricSet::new(vec![Box::new(StreamingAccuracy::new("acc"))]);
    set.update(&labels, &predictions);
    set
}

/// Binary-classification metric set: accuracy, micro F1 and AUC,
/// seeded with the given batch. The accuracy is also recorded as
/// a scalar summary on the logging layer.
///
/// Labels and predictions are narrowed to i16 before
/// accumulation; class ids outside i16 range wrap. The binary
/// assumption (classes 0 and 1) is implicit, not enforced.
pub fn create_eval_binary<B: Backend>(
    labels:      Tensor<B, 1, Int>,
    predictions: Tensor<B, 1, Int>,
) -> MetricSet {
    let labels: Vec<i64> = to_host(labels).iter().map(|&v| v as i16 as i64).collect();
    let predictions: Vec<i64> =
        to_host(predictions).iter().map(|&v| v as i16 as i64).collect();

    let mut set = MetricSet::new(vec![
        Box::new(StreamingAccuracy::new("accuracy")),
        Box::new(StreamingF1::new()),
        Box::new(StreamingAuc::new()),
    ]);
    set.update(&labels, &predictions);

    if let Some(accuracy) = set.get("accuracy") {
        tracing::info!(target: "summary", accuracy, "scalar summary");
    }

    set
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn int_tensor(values: &[i64]) -> Tensor<TestBackend, 1, Int> {
        let device = Default::default();
        Tensor::from_ints(values, &device)
    }

    #[test]
    fn test_create_eval_reports_accuracy_only() {
        let set = create_eval(int_tensor(&[0, 1, 1, 0]), int_tensor(&[0, 1, 0, 0]));
        let values = set.values();

        assert_eq!(values.len(), 1);
        assert!((values["acc"] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_create_eval_binary_one_wrong() {
        let set = create_eval_binary(int_tensor(&[0, 1, 1, 0]), int_tensor(&[0, 1, 0, 0]));
        let values = set.values();

        // One missed positive out of four samples
        assert!((values["accuracy"] - 0.75).abs() < 1e-9);
        // tp=1, fp=0, fn=1 → f1 = 2/3
        assert!((values["f1"] - 2.0 / 3.0).abs() < 1e-9);
        // tpr=0.5 at fpr=0 → area 0.75
        assert!((values["auc"] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_create_eval_binary_perfect() {
        let set = create_eval_binary(int_tensor(&[0, 1, 1, 0]), int_tensor(&[0, 1, 1, 0]));
        let values = set.values();

        assert!((values["accuracy"] - 1.0).abs() < 1e-9);
        assert!((values["f1"] - 1.0).abs() < 1e-9);
        assert!((values["auc"] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_streaming_accumulates_across_batches() {
        let mut set = create_eval_binary(int_tensor(&[0, 1]), int_tensor(&[0, 1]));
        assert!((set.get("accuracy").unwrap() - 1.0).abs() < 1e-9);

        // Second batch: both wrong → running accuracy drops to 0.5
        set.update(&[1, 0], &[0, 1]);
        assert!((set.get("accuracy").unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_empty_stream_is_zero() {
        let acc = StreamingAccuracy::new("acc");
        assert_eq!(acc.value(), 0.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_update_rejects_length_mismatch() {
        let mut acc = StreamingAccuracy::new("acc");
        acc.update(&[0, 1], &[0]);
    }
}
