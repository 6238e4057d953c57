// ============================================================
// CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `forward` and `evaluate`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand, ValueEnum};

use crate::ml::embedding::EmbeddingKind;
use crate::ml::model::ClstmConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a CLSTM model and run one forward pass on a random batch
    Forward(ForwardArgs),

    /// Score a label/prediction CSV file with the metric helpers
    Evaluate(EvaluateArgs),
}

/// Embedding initialisation strategy, as a CLI flag value
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum EmbeddingTypeArg {
    /// Standard-normal initialisation
    RandomNormal,

    /// Small uniform initialisation, U(-0.05, 0.05)
    RandomUniform,
}

impl From<EmbeddingTypeArg> for EmbeddingKind {
    fn from(a: EmbeddingTypeArg) -> Self {
        match a {
            EmbeddingTypeArg::RandomNormal => EmbeddingKind::RandomNormal,
            EmbeddingTypeArg::RandomUniform => EmbeddingKind::RandomUniform,
        }
    }
}

/// All arguments for the `forward` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct ForwardArgs {
    /// Total number of unique tokens the model can recognise
    #[arg(long, default_value_t = 8000)]
    pub vocab_size: usize,

    /// Width of each embedding vector
    #[arg(long, default_value_t = 128)]
    pub embedding_size: usize,

    /// How the embedding table is initialised
    #[arg(long, value_enum, default_value = "random-normal")]
    pub embedding_type: EmbeddingTypeArg,

    /// Convolution kernel widths, one conv branch per width
    #[arg(long, value_delimiter = ',', default_value = "3,4,5")]
    pub kernel_sizes: Vec<usize>,

    /// Output channels shared by every conv branch
    #[arg(long, default_value_t = 128)]
    pub filters: usize,

    /// Per-direction LSTM hidden size
    #[arg(long, default_value_t = 128)]
    pub rnn_hidden_size: usize,

    /// Reduce with max+avg pooling and batch-norm instead of a
    /// plain max over the time axis
    #[arg(long)]
    pub use_pooling: bool,

    /// Keep-probability of the dropout after the embedding
    #[arg(long, default_value_t = 0.5)]
    pub embedding_dropout_keep: f64,

    /// Keep-probability of the dropout on the BiLSTM output
    #[arg(long, default_value_t = 0.5)]
    pub rnn_dropout_keep: f64,

    /// Keep-probability of the dropout before the output layer
    #[arg(long, default_value_t = 0.5)]
    pub dropout_keep: f64,

    /// Fixed input sequence length (also the pooling window)
    #[arg(long, default_value_t = 100)]
    pub seq_length: usize,

    /// Number of output classes
    #[arg(long, default_value_t = 2)]
    pub n_class: usize,

    /// Rows in the random demo batch
    #[arg(long, default_value_t = 4)]
    pub batch_size: usize,

    /// Build the model with its training-mode dropout sites active
    #[arg(long)]
    pub training: bool,
}

/// Convert CLI ForwardArgs into the model-layer ClstmConfig.
/// The ml layer never sees clap types.
impl From<&ForwardArgs> for ClstmConfig {
    fn from(a: &ForwardArgs) -> Self {
        ClstmConfig::new()
            .with_vocab_size(a.vocab_size)
            .with_embedding_size(a.embedding_size)
            .with_embedding_kind(a.embedding_type.into())
            .with_kernel_sizes(a.kernel_sizes.clone())
            .with_filters(a.filters)
            .with_rnn_hidden_size(a.rnn_hidden_size)
            .with_use_pooling(a.use_pooling)
            .with_embedding_dropout_keep(a.embedding_dropout_keep)
            .with_rnn_dropout_keep(a.rnn_dropout_keep)
            .with_dropout_keep(a.dropout_keep)
            .with_seq_length(a.seq_length)
            .with_n_class(a.n_class)
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// CSV file with one `label,prediction` row per sample
    /// (a `label,prediction` header row is skipped if present)
    #[arg(long)]
    pub file: String,

    /// Use the streaming binary metric set (accuracy, f1, auc)
    /// instead of the one-shot batch report
    #[arg(long)]
    pub streaming: bool,
}
