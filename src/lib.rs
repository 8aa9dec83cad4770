//! # Butterfly-csr Library
//!
//! Compacts a road-network graph into static compressed-sparse-row arrays
//! for embedding in routing front-ends.
//!
//! ## Pipeline
//!
//! - **Degree filter**: isolated and dead-end nodes (degree < 2 on the
//!   original graph) are dropped in a single pass
//! - **Dense reindexing**: survivors are renumbered `0..NODE_COUNT` in input order
//! - **Symmetric CSR**: every edge is stored in both directions, each node's
//!   neighbors sorted by (index, weight) for reproducible output
//! - **Canvas projection**: coordinates are normalized onto a 1200x800 canvas
//! - **Export**: C++ header, JSON or checksummed binary
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use butterfly_csr::RoadGraph;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let graph = RoadGraph::from_path("arequipa_graph.json")?;
//!     let compact = butterfly_csr::compact(&graph)?;
//!     println!("{} nodes, {} adjacency entries", compact.node_count(), compact.edge_count());
//!
//!     // Or straight from file to file
//!     butterfly_csr::convert_file("arequipa_graph.json", "grafo_arequipa.h")?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

// Re-export core types that users might need
pub use crate::core::compactor::{
    CompactGraph, CompactOptions, CompactStats, CsrGraph, FilteredGraph, GraphCompactor,
    DEFAULT_MIN_DEGREE,
};
pub use crate::core::convert::{
    resolve_output_path, ConversionSummary, ConvertOptions, Converter, OverwriteBehavior,
};
pub use crate::core::error::{Axis, Error, Result};
pub use crate::core::export::{
    export_to_vec, read_binary, CsrBlobFile, ExportFormat, ExportOptions, Exporter,
};
pub use crate::core::graph::{Edge, Node, NodeId, RoadGraph};
pub use crate::core::projection::{BoundingBox, Canvas};

// Internal modules
mod core;

/// Compact a road graph with default options
///
/// Drops nodes with degree < 2 and projects onto the default 1200x800 canvas.
///
/// # Examples
/// ```rust
/// use butterfly_csr::{Edge, Node, RoadGraph};
///
/// let graph = RoadGraph::new(
///     vec![
///         Node::new(1, 0.0, 0.0),
///         Node::new(2, 1.0, 0.0),
///         Node::new(3, 1.0, 1.0),
///         Node::new(4, 0.0, 1.0),
///     ],
///     vec![Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 4), Edge::new(4, 1)],
/// );
///
/// let compact = butterfly_csr::compact(&graph).unwrap();
/// assert_eq!(compact.offsets(), &[0, 2, 4, 6, 8]);
/// ```
pub fn compact(graph: &RoadGraph) -> Result<CompactGraph> {
    GraphCompactor::default().compact(graph)
}

/// Compact a road graph with custom options
pub fn compact_with_options(graph: &RoadGraph, options: CompactOptions) -> Result<CompactGraph> {
    GraphCompactor::new(options).compact(graph)
}

/// Convert a JSON road graph file into a C++ header
///
/// Fails if `output` already exists; use [`convert_file_with_options`] with
/// [`OverwriteBehavior::Force`] to replace it.
pub fn convert_file<P, Q>(input: P, output: Q) -> Result<ConversionSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    convert_file_with_options(input, output, ConvertOptions::default())
}

/// Convert a JSON road graph file with custom options
///
/// # Examples
/// ```rust,no_run
/// use butterfly_csr::{ConvertOptions, ExportFormat, OverwriteBehavior};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ConvertOptions {
///     format: ExportFormat::Binary,
///     overwrite: OverwriteBehavior::Force,
///     ..Default::default()
/// };
/// let summary = butterfly_csr::convert_file_with_options("graph.json", "graph.bcsr", options)?;
/// println!("dropped {} dead-end nodes", summary.dropped_nodes);
/// # Ok(())
/// # }
/// ```
pub fn convert_file_with_options<P, Q>(
    input: P,
    output: Q,
    options: ConvertOptions,
) -> Result<ConversionSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Converter::new(options).convert_file(input.as_ref(), output.as_ref())
}
