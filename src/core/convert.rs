//! End-to-end conversion: load JSON, compact, export
//!
//! This is the only layer that logs or touches the filesystem. The
//! compactor itself stays pure.

use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::compactor::{CompactGraph, CompactOptions, CompactStats, GraphCompactor};
use crate::core::error::{Error, Result};
use crate::core::export::{self, ExportFormat, ExportOptions};
use crate::core::graph::RoadGraph;

/// Overwrite behavior for existing output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteBehavior {
    /// Replace an existing file
    Force,
    /// Fail if the destination already exists
    #[default]
    NeverOverwrite,
}

/// Configuration for a conversion run
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub compact: CompactOptions,
    pub format: ExportFormat,
    pub export: ExportOptions,
    pub overwrite: OverwriteBehavior,
}

impl ConvertOptions {
    pub fn validate(&self) -> Result<()> {
        self.compact.canvas.validate()?;
        self.export.validate()
    }
}

/// What a conversion kept and dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub input_nodes: usize,
    pub input_edges: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub dropped_nodes: usize,
    pub dropped_edges: usize,
    pub self_loops: usize,
}

impl ConversionSummary {
    fn new(stats: CompactStats, graph: &CompactGraph) -> Self {
        Self {
            input_nodes: stats.input_nodes,
            input_edges: stats.input_edges,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            dropped_nodes: stats.dropped_nodes,
            dropped_edges: stats.dropped_edges,
            self_loops: stats.self_loops,
        }
    }
}

/// Derive `<stem>.<ext>` next to the input file, or `<stem>.csr.<ext>` when
/// that would name the input itself
pub fn resolve_output_path(input: &Path, format: ExportFormat) -> PathBuf {
    let candidate = input.with_extension(format.extension());
    if candidate != input {
        return candidate;
    }
    input.with_extension(format!("csr.{}", format.extension()))
}

pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Load and compact a road graph file, logging what was pruned
    pub fn compact_file(&self, input: &Path) -> Result<(CompactGraph, ConversionSummary)> {
        self.options.validate()?;

        let graph = RoadGraph::from_path(input)?;
        info!(
            "Loaded {} nodes and {} edges from {}",
            graph.nodes.len(),
            graph.edges.len(),
            input.display()
        );

        self.compact_graph(&graph)
    }

    pub fn compact_graph(&self, graph: &RoadGraph) -> Result<(CompactGraph, ConversionSummary)> {
        let compactor = GraphCompactor::new(self.options.compact);
        let filtered = compactor.build_csr(graph)?;
        let stats = filtered.stats;

        debug!(
            "Degree filter (min {}): dropped {} nodes and {} edges",
            self.options.compact.min_degree, stats.dropped_nodes, stats.dropped_edges
        );
        if stats.self_loops > 0 {
            warn!(
                "{} self-loop edge(s) kept; each appears twice in its node's neighbor list",
                stats.self_loops
            );
        }

        let compact = filtered.project(&self.options.compact.canvas)?;
        let summary = ConversionSummary::new(stats, &compact);
        info!(
            "Compacted to NODE_COUNT={} EDGE_COUNT={}",
            summary.node_count, summary.edge_count
        );

        Ok((compact, summary))
    }

    /// Convert into an arbitrary writer (e.g. stdout)
    pub fn convert_to_writer(&self, input: &Path, out: &mut dyn Write) -> Result<ConversionSummary> {
        let (compact, summary) = self.compact_file(input)?;
        // Serialize fully before emitting so a failure never leaves partial output
        let bytes = export::export_to_vec(&compact, self.options.format, self.options.export)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(summary)
    }

    /// Convert `input` into `output`, replacing it atomically
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<ConversionSummary> {
        ensure_distinct_paths(input, output)?;
        check_overwrite_permission(output, self.options.overwrite)?;

        let (compact, summary) = self.compact_file(input)?;

        let tmp_path = temp_path_for(output);
        let written = write_export(&tmp_path, &compact, &self.options)
            .and_then(|()| fs::rename(&tmp_path, output).map_err(Error::from));
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        info!(
            "Wrote {} export to {}",
            self.options.format,
            output.display()
        );
        Ok(summary)
    }
}

/// The input graph must never be replaced by its own export
fn ensure_distinct_paths(input: &Path, output: &Path) -> Result<()> {
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(Error::InvalidOption(format!(
            "output {} is the input file; choose another output path",
            output.display()
        )));
    }
    Ok(())
}

fn check_overwrite_permission(path: &Path, behavior: OverwriteBehavior) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    match behavior {
        OverwriteBehavior::Force => {
            warn!("Overwriting existing file: {}", path.display());
            Ok(())
        }
        OverwriteBehavior::NeverOverwrite => Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!(
                "File already exists: {} (use --force to overwrite)",
                path.display()
            ),
        ))),
    }
}

fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!(".{name}.tmp"))
}

fn write_export(path: &Path, compact: &CompactGraph, options: &ConvertOptions) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    export::exporter(options.format, options.export).export(compact, &mut writer)
}
