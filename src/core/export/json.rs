//! JSON exporter
//!
//! Floats are rounded to the configured precision before serialization so
//! regenerating from the same input yields byte-identical documents.

use serde::Serialize;
use std::io::Write;

use super::{fixed, ExportOptions, Exporter};
use crate::core::compactor::CompactGraph;
use crate::core::error::Result;

#[derive(Serialize)]
struct JsonCsr<'a> {
    node_count: usize,
    edge_count: usize,
    offset: &'a [u64],
    neighbor: &'a [u32],
    weight: Vec<f64>,
    pos_x: Vec<f64>,
    pos_y: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    options: ExportOptions,
}

impl JsonExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    fn round(&self, values: &[f64]) -> Vec<f64> {
        let precision = self.options.precision;
        values
            .iter()
            .map(|&v| fixed(v, precision).parse().unwrap_or(v))
            .collect()
    }
}

impl Exporter for JsonExporter {
    fn export(&self, graph: &CompactGraph, out: &mut dyn Write) -> Result<()> {
        let document = JsonCsr {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            offset: graph.offsets(),
            neighbor: graph.neighbors(),
            weight: self.round(graph.weights()),
            pos_x: self.round(&graph.pos_x),
            pos_y: self.round(&graph.pos_y),
        };

        serde_json::to_writer(&mut *out, &document)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
