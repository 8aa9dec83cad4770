//! Road graph interchange model
//!
//! Mirrors the JSON document produced by the network extractor:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "lon": -71.53, "lat": -16.40 }],
//!   "edges": [{ "from": 1, "to": 2 }]
//! }
//! ```
//!
//! Additional fields (tags, way ids, ...) are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::error::Result;

/// Opaque node identifier
///
/// OSM exports use integers, hand-made fixtures often use strings. The two
/// spaces never alias: `1` and `"1"` are different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(id) => write!(f, "{id}"),
            NodeId::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId::Int(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::Text(id.to_string())
    }
}

/// A road-network vertex in raw geographic coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
        }
    }
}

/// Undirected connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Raw node/edge lists as read from the interchange file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl RoadGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Load a road graph from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_parse_integer_and_string_ids() {
        let graph = RoadGraph::from_json_str(
            r#"{
                "nodes": [
                    {"id": 101, "lon": -71.5, "lat": -16.4},
                    {"id": "depot", "lon": -71.6, "lat": -16.3}
                ],
                "edges": [{"from": 101, "to": "depot"}]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes[0].id, NodeId::Int(101));
        assert_eq!(graph.nodes[1].id, NodeId::Text("depot".to_string()));
        assert_eq!(graph.edges[0], Edge::new(101, "depot"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let graph = RoadGraph::from_json_str(
            r#"{
                "directed": false,
                "nodes": [{"id": 1, "lon": 0.0, "lat": 1.0, "street_count": 3}],
                "edges": [{"from": 1, "to": 1, "osmid": 99, "length": 12.5}]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges[0].is_self_loop());
    }

    #[test]
    fn test_int_and_text_ids_do_not_alias() {
        assert_ne!(NodeId::from(1), NodeId::from("1"));
    }

    #[test]
    fn test_missing_field_is_json_error() {
        let err = RoadGraph::from_json_str(r#"{"nodes": [{"id": 1, "lon": 0.0}], "edges": []}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RoadGraph::from_path("/nonexistent/road-graph.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
