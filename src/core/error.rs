//! Error types for butterfly-csr
//!
//! Every failure is fatal to a single conversion: no partial arrays are
//! ever returned alongside an error.

use std::fmt;

use crate::core::graph::NodeId;

/// Coordinate axis used when reporting a degenerate bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Longitude,
    Latitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Longitude => write!(f, "longitude"),
            Axis::Latitude => write!(f, "latitude"),
        }
    }
}

/// Main error type for butterfly-csr operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edge references a node identifier absent from the node list
    #[error("Edge #{edge} references unknown node '{node}'")]
    Reference { node: NodeId, edge: usize },

    /// The same identifier appears more than once in the node list
    #[error("Node '{0}' is declared more than once")]
    DuplicateNode(NodeId),

    /// Surviving nodes span zero extent on one axis, so projection is undefined
    #[error("All surviving nodes share the same {axis} ({value}); cannot normalize coordinates")]
    DegenerateRange { axis: Axis, value: f64 },

    /// A node coordinate is NaN or infinite
    #[error("Node '{node}' has a non-finite coordinate (lon {lon}, lat {lat})")]
    NonFiniteCoordinate { node: NodeId, lon: f64, lat: f64 },

    /// The extent on one axis overflows `f64`, so projection is undefined
    #[error("Surviving nodes span a non-finite {axis} range ({span}); cannot normalize coordinates")]
    UnboundedRange { axis: Axis, span: f64 },

    /// The planar length of an edge overflows `f64`
    #[error("Edge #{edge} has a non-finite length")]
    NonFiniteWeight { edge: usize },

    /// Degree filtering removed every node
    #[error("No node has degree >= {min_degree}; the compacted graph would be empty")]
    EmptyGraph { min_degree: u32 },

    /// Invalid configuration or parameters
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Node or edge counts do not fit the exported index types
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Malformed binary CSR blob
    #[error("Invalid CSR format: {0}")]
    Format(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input document is not a valid road graph
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for butterfly-csr operations
pub type Result<T> = std::result::Result<T, Error>;
