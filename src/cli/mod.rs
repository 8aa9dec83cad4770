//! CLI-specific utilities for butterfly-csr
//!
//! Output destination handling and the human-readable run report, kept
//! separate from the core library functionality.

use butterfly_csr::{resolve_output_path, ConversionSummary, ExportFormat};
use std::path::{Path, PathBuf};

/// Output destination types
#[derive(Debug, PartialEq, Eq)]
pub enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Resolve output destination from CLI arguments
pub fn resolve_output(input: &Path, output: Option<&str>, format: ExportFormat) -> OutputDestination {
    match output {
        Some("-") => OutputDestination::Stdout,
        Some(path) if !path.is_empty() => OutputDestination::File(PathBuf::from(path)),
        _ => OutputDestination::File(resolve_output_path(input, format)),
    }
}

/// Print the conversion report to stderr
pub fn print_summary(summary: &ConversionSummary) {
    eprintln!(
        "📊 Input: {} nodes, {} edges",
        summary.input_nodes, summary.input_edges
    );
    eprintln!(
        "✂️  Pruned: {} nodes, {} edges",
        summary.dropped_nodes, summary.dropped_edges
    );
    eprintln!(
        "✅ NODE_COUNT = {}, EDGE_COUNT = {}",
        summary.node_count, summary.edge_count
    );
}
