//! # Butterfly-csr CLI
//!
//! Command-line interface for the butterfly-csr library.
//! Converts a JSON road graph into static CSR arrays.

use anyhow::{Context, Result};
use butterfly_csr::{
    Canvas, CompactOptions, ConvertOptions, Converter, ExportFormat, ExportOptions,
    OverwriteBehavior,
};
use clap::Parser;
use log::error;
use std::path::PathBuf;

mod cli;

use cli::OutputDestination;

/// Command-line interface for butterfly-csr
#[derive(Parser)]
#[command(name = "butterfly-csr")]
#[command(about = "Compact a road-network graph into static CSR arrays")]
#[command(long_about = "Converts a JSON road graph into compressed-sparse-row arrays:
  butterfly-csr arequipa_graph.json                  # Writes arequipa_graph.h
  butterfly-csr graph.json grafo.h                   # Explicit output file
  butterfly-csr graph.json - --format json           # JSON to stdout
  butterfly-csr graph.json graph.bcsr -f binary      # Checksummed binary blob

Nodes with fewer than --min-degree incident edges are dropped once, the
survivors are renumbered densely and projected onto a --width x --height canvas.")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    /// Input road graph (JSON with `nodes` and `edges`)
    input: PathBuf,

    /// Output file path, or "-" for stdout (default: input name with the format's extension)
    output: Option<String>,

    /// Output format: header, json or binary
    #[arg(short, long, default_value = "header")]
    format: ExportFormat,

    /// Minimum original degree for a node to be kept
    #[arg(long, default_value_t = butterfly_csr::DEFAULT_MIN_DEGREE)]
    min_degree: u32,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Decimal places for weights and coordinates in textual formats
    #[arg(long, default_value_t = 6)]
    precision: usize,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn convert_options(&self) -> Result<ConvertOptions> {
        let canvas = Canvas::new(self.width, self.height)?;
        let export = ExportOptions {
            precision: self.precision,
        };
        export.validate()?;

        Ok(ConvertOptions {
            compact: CompactOptions {
                min_degree: self.min_degree,
                canvas,
            },
            format: self.format,
            export,
            overwrite: if self.force {
                OverwriteBehavior::Force
            } else {
                OverwriteBehavior::NeverOverwrite
            },
        })
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        eprintln!("🦋 Butterfly-csr v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    let options = cli.convert_options()?;
    let converter = Converter::new(options);
    let input = cli.input.as_path();

    match cli::resolve_output(input, cli.output.as_deref(), cli.format) {
        OutputDestination::File(path) => {
            eprintln!("📁 Saving to: {}", path.display());
            let summary = converter
                .convert_file(input, &path)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            cli::print_summary(&summary);
        }
        OutputDestination::Stdout => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            let summary = converter
                .convert_to_writer(input, &mut lock)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            if cli.verbose {
                cli::print_summary(&summary);
            }
        }
    }

    Ok(())
}
