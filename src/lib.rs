// ============================================================
// text-clstm — CLSTM text classifier + evaluation metrics
// ============================================================
// A hybrid convolution + bidirectional-LSTM sentence classifier
// (Zhou et al. 2015, "A C-LSTM Neural Network for Text
// Classification") and the metric helpers used to score it.
//
// Layer map:
//   cli/   — clap argument parsing, routes to the layers below
//   ml/    — all Burn-specific model code (embedding + pipeline)
//   eval/  — streaming and one-shot evaluation metrics
//
// Training, data loading and checkpointing are deliberately
// out of scope: this crate defines the forward computation and
// the scoring functions, the surrounding loop belongs to the
// caller.

#![recursion_limit = "256"]

/// CLI argument parsing and command dispatch
pub mod cli;

/// Burn model code: embedding sub-layer and the CLSTM pipeline
pub mod ml;

/// Evaluation metrics: streaming accumulators and batch statistics
pub mod eval;
