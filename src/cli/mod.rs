// ============================================================
// CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
//
// Two commands are supported:
//   1. `forward`  — builds a CLSTM model from hyperparameter
//                   flags and runs one forward pass on a random
//                   token batch (a smoke test of the pipeline)
//   2. `evaluate` — scores a `label,prediction` CSV file with
//                   either the one-shot batch report or the
//                   streaming binary metric set

// Declare the commands submodule
pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, EvaluateArgs, ForwardArgs};

use burn::prelude::*;
use burn::tensor::Distribution;

use crate::eval::{create_eval_batch, create_eval_binary};
use crate::ml::model::ClstmConfig;

// The demo forward pass runs on the GPU backend; metric scoring
// is host-side arithmetic and stays on the CPU backend.
type GpuBackend = burn::backend::Wgpu;
type CpuBackend = burn::backend::NdArray;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "text-clstm",
    version = "0.1.0",
    about = "CLSTM text classifier: run a forward pass or score predictions."
)]
pub struct Cli {
    /// The subcommand to run (forward or evaluate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Forward(ref args) => self.run_forward(args),
            Commands::Evaluate(ref args) => self.run_evaluate(args),
        }
    }

    /// Handles the `forward` subcommand.
    fn run_forward(&self, args: &ForwardArgs) -> Result<()> {
        let config = ClstmConfig::from(args);
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);

        let model = config.init::<GpuBackend>(args.training, &device);
        tracing::info!(
            "Model ready: {} conv widths, {} filters, rnn_hidden={}",
            config.kernel_sizes.len(),
            config.filters,
            config.rnn_hidden_size,
        );

        // Random token batch in [0, vocab_size)
        let tokens = Tensor::<GpuBackend, 2, Int>::random(
            [args.batch_size, config.seq_length],
            Distribution::Uniform(0.0, config.vocab_size as f64),
            &device,
        );

        let logits = model.forward(tokens);
        let [batch, n_class] = logits.dims();
        println!("logits: [{batch}, {n_class}]");

        // First row as a sample so the numbers are visible
        let first: Vec<f32> = logits
            .slice([0..1, 0..n_class])
            .into_data()
            .iter::<f32>()
            .collect();
        println!("sample row: {first:?}");
        Ok(())
    }

    /// Handles the `evaluate` subcommand.
    fn run_evaluate(&self, args: &EvaluateArgs) -> Result<()> {
        let (labels, predictions) = read_label_file(&args.file)?;
        tracing::info!("Scoring {} samples from '{}'", labels.len(), args.file);

        let report = if args.streaming {
            let device = Default::default();
            let labels = Tensor::<CpuBackend, 1, Int>::from_ints(labels.as_slice(), &device);
            let predictions =
                Tensor::<CpuBackend, 1, Int>::from_ints(predictions.as_slice(), &device);
            create_eval_binary(labels, predictions).values()
        } else {
            create_eval_batch(&labels, &predictions)
        };

        for (name, value) in &report {
            println!("{name:<10} {value:.6}");
        }
        Ok(())
    }
}

/// Read `label,prediction` rows from a CSV file.
/// A non-numeric header row is skipped.
fn read_label_file(path: &str) -> Result<(Vec<i64>, Vec<i64>)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read predictions from '{path}'"))?;

    let mut labels = Vec::new();
    let mut predictions = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.splitn(2, ',');
        let label = fields.next().unwrap_or_default().trim();
        let prediction = fields
            .next()
            .with_context(|| format!("{path}:{}: expected 'label,prediction'", lineno + 1))?
            .trim();

        // Header row
        if lineno == 0 && label.parse::<i64>().is_err() {
            continue;
        }

        labels.push(
            label
                .parse::<i64>()
                .with_context(|| format!("{path}:{}: bad label '{label}'", lineno + 1))?,
        );
        predictions.push(prediction.parse::<i64>().with_context(|| {
            format!("{path}:{}: bad prediction '{prediction}'", lineno + 1)
        })?);
    }

    Ok((labels, predictions))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tempfile_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("text-clstm-test-{}-{name}", std::process::id()));
        path
    }

    #[test]
    fn test_read_label_file_with_header() {
        let tmp = tempfile_path("eval_header.csv");
        let mut f = std::fs::File::create(&tmp).unwrap();
        writeln!(f, "label,prediction").unwrap();
        writeln!(f, "0,0").unwrap();
        writeln!(f, "1,1").unwrap();
        writeln!(f, "1,0").unwrap();

        let (labels, predictions) = read_label_file(tmp.to_str().unwrap()).unwrap();
        assert_eq!(labels, vec![0, 1, 1]);
        assert_eq!(predictions, vec![0, 1, 0]);

        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn test_read_label_file_rejects_single_column() {
        let tmp = tempfile_path("eval_bad.csv");
        let mut f = std::fs::File::create(&tmp).unwrap();
        writeln!(f, "0").unwrap();

        assert!(read_label_file(tmp.to_str().unwrap()).is_err());

        std::fs::remove_file(&tmp).ok();
    }
}
