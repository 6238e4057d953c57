// ============================================================
// CLSTM Model Architecture (Burn)
// ============================================================
// Convolution + bidirectional LSTM text classifier.
//
// Pipeline, one forward pass:
//
//   tokens [batch, seq]
//     → embedding            [batch, seq, embed]
//     → (train) dropout
//     → conv bank, ReLU      [batch, seq, n_kernels × filters]
//     → BiLSTM               [batch, seq, 2 × hidden]
//     → (train) dropout
//     → max+avg pool + BN    [batch, 4 × hidden]
//       or max over time     [batch, 2 × hidden]
//     → (train) dropout
//     → dense                [batch, n_class]   (raw logits)
//
// The convolution bank runs one 1-D convolution per configured
// kernel width (same padding, stride 1) and concatenates the
// outputs along the feature axis, so the BiLSTM sees n-gram
// features at every width simultaneously.
//
// The `training` flag is fixed at construction. It only gates
// the dropout sites — everything else is identical between
// train and eval instances, so weights trained on one can be
// loaded into the other.
//
// No sequence-length masking is applied: inputs are assumed
// pre-padded to `seq_length`. With pooling enabled the pooling
// window equals `seq_length`, so a shorter input fails inside
// Burn's pooling kernel rather than being silently accepted.
//
// Reference: Burn Book §3 (Building Blocks)
//            Zhou et al. (2015) A C-LSTM Neural Network for
//            Text Classification

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        pool::{AvgPool1d, AvgPool1dConfig, MaxPool1d, MaxPool1dConfig},
        BatchNorm, BatchNormConfig, BiLstm, BiLstmConfig,
        Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig1d,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::ml::embedding::{EmbeddingKind, EmbeddingLayer};

// ─── ClstmConfig ──────────────────────────────────────────────────────────────
/// Every recognised hyperparameter of the CLSTM model.
///
/// Dropout sites are configured as keep-probabilities (the
/// fraction of units retained), matching the usual description
/// of this architecture; Burn's `Dropout` takes a drop
/// probability, so each site is initialised with `1 − keep`.
#[derive(Config, Debug)]
pub struct ClstmConfig {
    /// Number of rows in the embedding table
    #[config(default = 8000)]
    pub vocab_size: usize,

    /// Width of each embedding vector
    #[config(default = 128)]
    pub embedding_size: usize,

    /// Initialisation strategy for the embedding table
    #[config(default = "EmbeddingKind::RandomNormal")]
    pub embedding_kind: EmbeddingKind,

    /// One 1-D convolution per kernel width in this list
    #[config(default = "vec![3, 4, 5]")]
    pub kernel_sizes: Vec<usize>,

    /// Output channels shared by every convolution in the bank
    #[config(default = 128)]
    pub filters: usize,

    /// Per-direction LSTM hidden size
    #[config(default = 128)]
    pub rnn_hidden_size: usize,

    /// Max+avg pooling with batch-norm (true) vs a plain
    /// per-feature max over the time axis (false)
    #[config(default = false)]
    pub use_pooling: bool,

    /// Keep-probability of the dropout after the embedding
    #[config(default = 0.5)]
    pub embedding_dropout_keep: f64,

    /// Keep-probability of the dropout on the BiLSTM output
    #[config(default = 0.5)]
    pub rnn_dropout_keep: f64,

    /// Keep-probability of the dropout before the output layer
    #[config(default = 0.5)]
    pub dropout_keep: f64,

    /// Fixed input sequence length — also the pooling window
    #[config(default = 100)]
    pub seq_length: usize,

    /// Number of output classes (logit count)
    #[config(default = 2)]
    pub n_class: usize,
}

impl ClstmConfig {
    /// Build the model on the given device.
    ///
    /// `training` gates the three dropout sites and is fixed for
    /// the lifetime of the instance — build one instance for
    /// training and a second one for evaluation.
    pub fn init<B: Backend>(&self, training: bool, device: &B::Device) -> Clstm<B> {
        let embedding = EmbeddingLayer::new(
            self.vocab_size,
            self.embedding_size,
            &self.embedding_kind,
            device,
        );

        // One convolution per kernel width, all embed → filters,
        // same padding so every branch keeps the sequence length.
        let convs: Vec<Conv1d<B>> = self
            .kernel_sizes
            .iter()
            .map(|&kernel_size| {
                Conv1dConfig::new(self.embedding_size, self.filters, kernel_size)
                    .with_stride(1)
                    .with_padding(PaddingConfig1d::Same)
                    .init(device)
            })
            .collect();

        let bilstm = BiLstmConfig::new(
            self.kernel_sizes.len() * self.filters,
            self.rnn_hidden_size,
            true,
        )
        .init(device);

        // Both pooling branches collapse the full sequence to one step.
        let max_pool = MaxPool1dConfig::new(self.seq_length).with_stride(1).init();
        let avg_pool = AvgPool1dConfig::new(self.seq_length).with_stride(1).init();

        // Max and avg pooled vectors are concatenated before the
        // batch-norm, hence 4 × hidden channels.
        let norm = BatchNormConfig::new(4 * self.rnn_hidden_size).init(device);

        // The pooled path carries twice the features of the plain
        // max reduction, and the output layer width follows.
        let reduced_width = if self.use_pooling {
            4 * self.rnn_hidden_size
        } else {
            2 * self.rnn_hidden_size
        };
        let output = LinearConfig::new(reduced_width, self.n_class).init(device);

        Clstm {
            embedding,
            embed_dropout: DropoutConfig::new(1.0 - self.embedding_dropout_keep).init(),
            convs,
            bilstm,
            rnn_dropout: DropoutConfig::new(1.0 - self.rnn_dropout_keep).init(),
            max_pool,
            avg_pool,
            norm,
            out_dropout: DropoutConfig::new(1.0 - self.dropout_keep).init(),
            output,
            use_pooling: self.use_pooling,
            training,
        }
    }
}

// ─── Clstm ────────────────────────────────────────────────────────────────────
/// The CLSTM classifier. See the module header for the pipeline.
#[derive(Module, Debug)]
pub struct Clstm<B: Backend> {
    embedding:     EmbeddingLayer<B>,
    embed_dropout: Dropout,
    convs:         Vec<Conv1d<B>>,
    bilstm:        BiLstm<B>,
    rnn_dropout:   Dropout,
    max_pool:      MaxPool1d,
    avg_pool:      AvgPool1d,
    norm:          BatchNorm<B>,
    out_dropout:   Dropout,
    output:        Linear<B>,
    use_pooling:   bool,
    training:      bool,
}

impl<B: Backend> Clstm<B> {
    /// input_ids: [batch, seq_length] → logits: [batch, n_class]
    ///
    /// Raw logits, no activation — softmax / cross-entropy is the
    /// caller's concern.
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let embedded = self.embedding.forward(input_ids);
        let embedded = if self.training {
            self.embed_dropout.forward(embedded)
        } else {
            embedded
        };

        let features = self.conv_bank(embedded);

        let (encoded, _state) = self.bilstm.forward(features, None);
        // Elementwise dropout commutes with the direction concat,
        // so one dropout on the joined output covers both cells.
        let encoded = if self.training {
            self.rnn_dropout.forward(encoded)
        } else {
            encoded
        };

        let reduced = if self.use_pooling {
            self.pool(encoded)
        } else {
            // Per-feature max over the time axis, no normalisation
            let [batch, _, feat] = encoded.dims();
            encoded.max_dim(1).reshape([batch, feat])
        };

        let reduced = if self.training {
            self.out_dropout.forward(reduced)
        } else {
            reduced
        };

        self.output.forward(reduced)
    }

    /// Multi-width convolution bank.
    ///
    /// [batch, seq, embed] → [batch, seq, n_kernels × filters]
    ///
    /// Each branch sees the same embedded sequence; outputs are
    /// concatenated along the feature axis.
    fn conv_bank(&self, embedded: Tensor<B, 3>) -> Tensor<B, 3> {
        // Conv1d wants channel-first: [batch, embed, seq]
        let x = embedded.swap_dims(1, 2);

        let branches: Vec<Tensor<B, 3>> = self
            .convs
            .iter()
            .map(|conv| relu(conv.forward(x.clone())))
            .collect();

        // [batch, n_kernels × filters, seq] → back to seq-major
        Tensor::cat(branches, 1).swap_dims(1, 2)
    }

    /// Max+avg pooling reduction.
    ///
    /// [batch, seq, 2 × hidden] → [batch, 4 × hidden]
    ///
    /// Both pools use a window of the full sequence length, so the
    /// time axis collapses to a single step; the concatenated pair
    /// is batch-normalised before the singleton axis is dropped.
    fn pool(&self, encoded: Tensor<B, 3>) -> Tensor<B, 2> {
        // channel-first for the pooling ops: [batch, 2 × hidden, seq]
        let x = encoded.swap_dims(1, 2);

        let max = self.max_pool.forward(x.clone()); // [batch, 2 × hidden, 1]
        let avg = self.avg_pool.forward(x);

        let pooled = Tensor::cat(vec![max, avg], 1); // [batch, 4 × hidden, 1]
        let normed = self.norm.forward(pooled);

        let [batch, feat, _] = normed.dims();
        normed.reshape([batch, feat])
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    /// Small config that keeps test tensors tiny
    fn small_config() -> ClstmConfig {
        ClstmConfig::new()
            .with_vocab_size(32)
            .with_embedding_size(8)
            .with_kernel_sizes(vec![2, 3])
            .with_filters(4)
            .with_rnn_hidden_size(6)
            .with_seq_length(8)
            .with_n_class(5)
    }

    /// Deterministic token batch: [batch, seq] filled with 0..batch*seq
    fn token_batch(batch: usize, seq: usize) -> Tensor<TestBackend, 2, Int> {
        let device = Default::default();
        Tensor::<TestBackend, 1, Int>::arange(0..(batch * seq) as i64, &device)
            .reshape([batch, seq])
    }

    #[test]
    fn test_forward_shape_max_reduction() {
        let device = Default::default();
        let model = small_config().init::<TestBackend>(false, &device);

        let logits = model.forward(token_batch(3, 8));
        assert_eq!(logits.dims(), [3, 5]);
    }

    #[test]
    fn test_forward_shape_with_pooling() {
        let device = Default::default();
        let model = small_config()
            .with_use_pooling(true)
            .init::<TestBackend>(false, &device);

        let logits = model.forward(token_batch(3, 8));
        assert_eq!(logits.dims(), [3, 5]);
    }

    #[test]
    fn test_eval_forward_is_deterministic() {
        let device = Default::default();
        let model = small_config().init::<TestBackend>(false, &device);

        let a = model.forward(token_batch(2, 8));
        let b = model.forward(token_batch(2, 8));

        let a: Vec<f32> = a.into_data().iter::<f32>().collect();
        let b: Vec<f32> = b.into_data().iter::<f32>().collect();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6, "eval forward must be repeatable");
        }
    }

    #[test]
    fn test_conv_bank_concatenates_feature_axis() {
        let device = Default::default();
        // 2 kernel widths × 4 filters → 8 features per timestep
        let model = small_config().init::<TestBackend>(false, &device);

        let embedded = model.embedding.forward(token_batch(3, 8));
        let features = model.conv_bank(embedded);
        assert_eq!(features.dims(), [3, 8, 2 * 4]);
    }

    #[test]
    #[should_panic]
    fn test_pooling_rejects_short_sequence() {
        let device = Default::default();
        let model = small_config()
            .with_use_pooling(true)
            .init::<TestBackend>(false, &device);

        // seq_length is 8 — a window of 8 cannot slide over 4 steps
        model.forward(token_batch(3, 4));
    }

    #[test]
    fn test_training_instance_runs() {
        let device = Default::default();
        let model = small_config()
            .with_use_pooling(true)
            .init::<TestBackend>(true, &device);

        let logits = model.forward(token_batch(2, 8));
        assert_eq!(logits.dims(), [2, 5]);
    }
}
