//! Serializers for compacted graphs
//!
//! Every exporter is deterministic: the same [`CompactGraph`] always
//! produces the same bytes. Nothing time- or host-dependent is embedded.

pub mod binary;
pub mod header;
pub mod json;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::core::compactor::CompactGraph;
use crate::core::error::{Error, Result};

pub use binary::{read_binary, BinaryExporter, CsrBlobFile};
pub use header::HeaderExporter;
pub use json::JsonExporter;

pub const DEFAULT_PRECISION: usize = 6;
const MAX_PRECISION: usize = 17;

/// Output medium for a compacted graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// C++ header with `constexpr` arrays
    #[default]
    Header,
    /// JSON document
    Json,
    /// Checksummed little-endian blob
    Binary,
}

impl ExportFormat {
    /// File extension used when the output path is derived from the input
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Header => "h",
            ExportFormat::Json => "json",
            ExportFormat::Binary => "bcsr",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Header => write!(f, "header"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "header" | "h" | "hpp" | "cpp" => Ok(ExportFormat::Header),
            "json" => Ok(ExportFormat::Json),
            "binary" | "bin" | "bcsr" => Ok(ExportFormat::Binary),
            other => Err(Error::InvalidOption(format!(
                "unknown export format '{other}' (expected header, json or binary)"
            ))),
        }
    }
}

/// Options shared by all exporters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Decimal places for weights and coordinates in textual formats
    pub precision: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::InvalidOption(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Writes the five CSR arrays to some medium
pub trait Exporter {
    fn export(&self, graph: &CompactGraph, out: &mut dyn Write) -> Result<()>;
}

/// Build the exporter for `format`
pub fn exporter(format: ExportFormat, options: ExportOptions) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Header => Box::new(HeaderExporter::new(options)),
        ExportFormat::Json => Box::new(JsonExporter::new(options)),
        ExportFormat::Binary => Box::new(BinaryExporter),
    }
}

/// Export into an in-memory buffer
pub fn export_to_vec(
    graph: &CompactGraph,
    format: ExportFormat,
    options: ExportOptions,
) -> Result<Vec<u8>> {
    options.validate()?;
    let mut buffer = Vec::new();
    exporter(format, options).export(graph, &mut buffer)?;
    Ok(buffer)
}

/// Format a float with a fixed number of decimals
pub(crate) fn fixed(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Header and binary formats index with 32-bit signed ints
pub(crate) fn ensure_int_range(name: &str, count: usize) -> Result<i32> {
    i32::try_from(count).map_err(|_| {
        Error::CapacityExceeded(format!("{name} = {count} does not fit a 32-bit int"))
    })
}
