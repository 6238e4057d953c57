// ============================================================
// Embedding Sub-Layer
// ============================================================
// Maps token indices to dense vectors. The embedding table is
// owned by this wrapper and constructed once per model; the
// initialisation strategy is chosen from configuration so the
// same model code works with either init scheme.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{Embedding, EmbeddingConfig, Initializer},
    prelude::*,
};

// ─── EmbeddingKind ────────────────────────────────────────────────────────────
/// How the embedding table is initialised.
///
/// Selected by the `embedding_kind` config field. Both variants
/// produce a learned table — only the starting distribution
/// differs.
#[derive(Config, Debug, PartialEq)]
pub enum EmbeddingKind {
    /// Standard-normal initialisation (Burn's embedding default)
    RandomNormal,

    /// Small uniform initialisation, U(-0.05, 0.05)
    RandomUniform,
}

// ─── EmbeddingLayer ───────────────────────────────────────────────────────────
/// The owned embedding sub-layer of the CLSTM model.
#[derive(Module, Debug)]
pub struct EmbeddingLayer<B: Backend> {
    /// The token-embedding table — shape [vocab_size, embed_size]
    table: Embedding<B>,
}

impl<B: Backend> EmbeddingLayer<B> {
    /// Build the embedding table for the given vocabulary and width.
    pub fn new(
        vocab_size: usize,
        embed_size: usize,
        kind:       &EmbeddingKind,
        device:     &B::Device,
    ) -> Self {
        let initializer = match kind {
            EmbeddingKind::RandomNormal => Initializer::Normal { mean: 0.0, std: 1.0 },
            EmbeddingKind::RandomUniform => Initializer::Uniform { min: -0.05, max: 0.05 },
        };

        let table = EmbeddingConfig::new(vocab_size, embed_size)
            .with_initializer(initializer)
            .init(device);

        Self { table }
    }

    /// token indices [batch, seq_len] → dense vectors [batch, seq_len, embed_size]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.table.forward(tokens)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_lookup_shape() {
        let device = Default::default();
        let layer = EmbeddingLayer::<TestBackend>::new(
            50, 16, &EmbeddingKind::RandomNormal, &device,
        );

        let tokens = Tensor::<TestBackend, 2, Int>::from_ints(
            [[0, 1, 2, 3], [4, 5, 6, 7]],
            &device,
        );
        let out = layer.forward(tokens);
        assert_eq!(out.dims(), [2, 4, 16]);
    }

    #[test]
    fn test_uniform_init_stays_small() {
        let device = Default::default();
        let layer = EmbeddingLayer::<TestBackend>::new(
            50, 16, &EmbeddingKind::RandomUniform, &device,
        );

        let tokens = Tensor::<TestBackend, 2, Int>::from_ints([[0, 1, 2]], &device);
        let out = layer.forward(tokens);

        // U(-0.05, 0.05) init — every looked-up value is inside that range
        let max_abs: f32 = out.abs().max().into_scalar().elem();
        assert!(max_abs <= 0.05);
    }
}
