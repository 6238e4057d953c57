// ============================================================
// Evaluation Layer
// ============================================================
// Metric helpers for scoring classifier predictions against
// ground-truth labels. Two independent surfaces:
//
//   streaming.rs — accumulating metrics fed batch by batch
//                  (accuracy, micro F1, thresholded AUC).
//                  Entry points take Burn integer tensors so
//                  they plug straight into an eval loop over
//                  model outputs.
//
//   batch.rs     — one-shot statistics over complete label /
//                  prediction slices (accuracy, micro
//                  precision / recall / F1, AUC).
//
// Both return a name → value mapping, so callers can print or
// log a whole report without knowing individual metric types.

/// Streaming metric accumulators and their factory functions
pub mod streaming;

/// One-shot batch statistics over complete slices
pub mod batch;

pub use batch::create_eval_batch;
pub use streaming::{create_eval, create_eval_binary, MetricSet, StreamingMetric};
