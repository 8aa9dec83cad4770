//! C++ header exporter
//!
//! Emits the arrays as `constexpr` declarations sized by `NODE_COUNT` and
//! `EDGE_COUNT`, ready to be `#include`d by the routing front-end.

use std::fmt::Display;
use std::io::Write;

use super::{ensure_int_range, fixed, ExportOptions, Exporter};
use crate::core::compactor::CompactGraph;
use crate::core::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderExporter {
    options: ExportOptions,
}

impl HeaderExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }
}

impl Exporter for HeaderExporter {
    fn export(&self, graph: &CompactGraph, out: &mut dyn Write) -> Result<()> {
        let node_count = ensure_int_range("NODE_COUNT", graph.node_count())?;
        let edge_count = ensure_int_range("EDGE_COUNT", graph.edge_count())?;
        let precision = self.options.precision;

        write!(out, "#pragma once\n\n")?;
        writeln!(out, "constexpr int NODE_COUNT = {node_count};")?;
        write!(out, "constexpr int EDGE_COUNT = {edge_count};\n\n")?;

        write_array(out, "constexpr int OFFSET[NODE_COUNT + 1]", graph.offsets())?;
        out.write_all(b"\n")?;
        write_array(out, "constexpr int NEIGHBOR[EDGE_COUNT]", graph.neighbors())?;
        out.write_all(b"\n")?;
        write_array(
            out,
            "constexpr double WEIGHT[EDGE_COUNT]",
            graph.weights().iter().map(|&w| fixed(w, precision)),
        )?;
        out.write_all(b"\n")?;
        write_array(
            out,
            "constexpr float POS_X[NODE_COUNT]",
            graph.pos_x.iter().map(|&x| fixed(x, precision)),
        )?;
        out.write_all(b"\n")?;
        write_array(
            out,
            "constexpr float POS_Y[NODE_COUNT]",
            graph.pos_y.iter().map(|&y| fixed(y, precision)),
        )?;

        out.flush()?;
        Ok(())
    }
}

/// `<decl> = {\n    a, b, c\n};\n`
fn write_array<I>(out: &mut dyn Write, decl: &str, values: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Display,
{
    write!(out, "{decl} = {{\n    ")?;
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b", ")?;
        }
        write!(out, "{value}")?;
    }
    write!(out, "\n}};\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compactor::CsrGraph;

    fn triangle() -> CompactGraph {
        CompactGraph {
            csr: CsrGraph {
                offsets: vec![0, 2, 4, 6],
                neighbors: vec![1, 2, 0, 2, 0, 1],
                weights: vec![1.0, 0.5, 1.0, 0.25, 0.5, 0.25],
            },
            pos_x: vec![0.0, 1200.0, 600.0],
            pos_y: vec![800.0, 800.0, 0.0],
        }
    }

    #[test]
    fn test_header_layout() {
        let mut out = Vec::new();
        HeaderExporter::default()
            .export(&triangle(), &mut out)
            .unwrap();

        let expected = "\
#pragma once

constexpr int NODE_COUNT = 3;
constexpr int EDGE_COUNT = 6;

constexpr int OFFSET[NODE_COUNT + 1] = {
    0, 2, 4, 6
};

constexpr int NEIGHBOR[EDGE_COUNT] = {
    1, 2, 0, 2, 0, 1
};

constexpr double WEIGHT[EDGE_COUNT] = {
    1.000000, 0.500000, 1.000000, 0.250000, 0.500000, 0.250000
};

constexpr float POS_X[NODE_COUNT] = {
    0.000000, 1200.000000, 600.000000
};

constexpr float POS_Y[NODE_COUNT] = {
    800.000000, 800.000000, 0.000000
};
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_precision_is_applied() {
        let mut out = Vec::new();
        HeaderExporter::new(ExportOptions { precision: 2 })
            .export(&triangle(), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1.00, 0.50, 1.00, 0.25, 0.50, 0.25"));
        assert!(text.contains("0.00, 1200.00, 600.00"));
    }
}
