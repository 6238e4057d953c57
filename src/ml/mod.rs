// ============================================================
// ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the eval layer's tensor-facing entry points.
//
// What's in this layer:
//
//   embedding.rs — The embedding sub-layer
//                  Owns the token-embedding table and selects
//                  its initialisation strategy from config.
//                  Passed into the model by composition, not
//                  inheritance.
//
//   model.rs     — The CLSTM architecture
//                  Implements the full forward pipeline:
//                  • Token embedding (+ input dropout)
//                  • Multi-width 1-D convolution bank (ReLU)
//                  • Bidirectional LSTM encoding
//                  • Max+avg pooling with batch-norm, or a
//                    plain max over the time axis
//                  • Dense projection to class logits
//
// Reference: Burn Book §3 (Building Blocks)
//            Zhou et al. (2015) A C-LSTM Neural Network for
//            Text Classification

/// Embedding sub-layer with a configurable init strategy
pub mod embedding;

/// The CLSTM forward pipeline and its typed configuration
pub mod model;
