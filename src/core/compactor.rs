//! Road graph compaction into compressed-sparse-row arrays
//!
//! The compactor runs as a single pure pass:
//!
//! 1. validate identifiers and edge endpoints
//! 2. count degrees on the unfiltered edge set (self-loops count twice)
//! 3. keep nodes with degree >= `min_degree`, renumbered densely in input order
//! 4. keep edges whose endpoints both survive, weighted by planar lon/lat distance
//! 5. build symmetric adjacency lists, sort each by (neighbor, weight), flatten
//! 6. project surviving coordinates onto the canvas
//!
//! Filtering is applied exactly once. A node whose degree falls below the
//! threshold only because a neighbor was pruned is kept.

use std::collections::HashMap;

use crate::core::error::{Error, Result};
use crate::core::graph::{NodeId, RoadGraph};
use crate::core::projection::{self, Canvas};

pub const DEFAULT_MIN_DEGREE: u32 = 2;

/// Options controlling compaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactOptions {
    /// Nodes with fewer incident edge endpoints are dropped
    pub min_degree: u32,
    /// Canvas the surviving coordinates are projected onto
    pub canvas: Canvas,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            canvas: Canvas::default(),
        }
    }
}

/// Flattened symmetric adjacency
///
/// Neighbors of node `i` are `neighbors[offsets[i]..offsets[i + 1]]`, with the
/// matching weights at the same positions in `weights`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsrGraph {
    pub offsets: Vec<u64>,  // node_count + 1
    pub neighbors: Vec<u32>, // edge_count
    pub weights: Vec<f64>,  // edge_count
}

impl CsrGraph {
    pub fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Number of adjacency entries (twice the undirected edge count)
    pub fn edge_count(&self) -> usize {
        self.neighbors.len()
    }

    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize..self.offsets[node + 1] as usize
    }

    /// Neighbor slice of `node`. Panics if `node >= node_count()`.
    pub fn neighbors_of(&self, node: usize) -> &[u32] {
        &self.neighbors[self.range(node)]
    }

    /// Weight slice of `node`. Panics if `node >= node_count()`.
    pub fn weights_of(&self, node: usize) -> &[f64] {
        &self.weights[self.range(node)]
    }

    /// Check the structural CSR invariants
    pub fn validate(&self) -> Result<()> {
        if self.offsets.first() != Some(&0) {
            return Err(Error::Format("OFFSET must start at 0".to_string()));
        }
        if self.neighbors.len() != self.weights.len() {
            return Err(Error::Format(format!(
                "NEIGHBOR has {} entries but WEIGHT has {}",
                self.neighbors.len(),
                self.weights.len()
            )));
        }
        if self.offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::Format("OFFSET is not non-decreasing".to_string()));
        }
        let last = self.offsets[self.offsets.len() - 1];
        if last != self.neighbors.len() as u64 {
            return Err(Error::Format(format!(
                "OFFSET ends at {last} but there are {} adjacency entries",
                self.neighbors.len()
            )));
        }
        let n_nodes = self.node_count() as u64;
        if let Some(&bad) = self.neighbors.iter().find(|&&v| u64::from(v) >= n_nodes) {
            return Err(Error::Format(format!(
                "neighbor index {bad} out of range for {n_nodes} nodes"
            )));
        }
        Ok(())
    }
}

/// Bookkeeping about what filtering removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactStats {
    pub input_nodes: usize,
    pub input_edges: usize,
    pub dropped_nodes: usize,
    pub dropped_edges: usize,
    pub self_loops: usize,
}

/// Result of degree filtering and CSR assembly, before projection
#[derive(Debug, Clone)]
pub struct FilteredGraph {
    pub csr: CsrGraph,
    /// Original identifier of each dense index
    pub node_ids: Vec<NodeId>,
    /// Raw (lon, lat) of each dense index
    pub coords: Vec<(f64, f64)>,
    pub stats: CompactStats,
}

impl FilteredGraph {
    pub fn node_count(&self) -> usize {
        self.csr.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.csr.edge_count()
    }

    /// Project the surviving coordinates and produce the exported arrays
    pub fn project(self, canvas: &Canvas) -> Result<CompactGraph> {
        let (pos_x, pos_y) = projection::project(&self.coords, canvas)?;
        Ok(CompactGraph {
            csr: self.csr,
            pos_x,
            pos_y,
        })
    }
}

/// The five exported arrays: OFFSET, NEIGHBOR, WEIGHT, POS_X, POS_Y
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactGraph {
    pub csr: CsrGraph,
    pub pos_x: Vec<f64>,
    pub pos_y: Vec<f64>,
}

impl CompactGraph {
    pub fn node_count(&self) -> usize {
        self.csr.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.csr.edge_count()
    }

    pub fn offsets(&self) -> &[u64] {
        &self.csr.offsets
    }

    pub fn neighbors(&self) -> &[u32] {
        &self.csr.neighbors
    }

    pub fn weights(&self) -> &[f64] {
        &self.csr.weights
    }

    pub fn validate(&self) -> Result<()> {
        self.csr.validate()?;
        let n = self.node_count();
        if self.pos_x.len() != n || self.pos_y.len() != n {
            return Err(Error::Format(format!(
                "expected {n} coordinates, got {} x and {} y",
                self.pos_x.len(),
                self.pos_y.len()
            )));
        }
        Ok(())
    }
}

/// Degree filter + CSR builder
#[derive(Debug, Clone, Default)]
pub struct GraphCompactor {
    options: CompactOptions,
}

impl GraphCompactor {
    pub fn new(options: CompactOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompactOptions {
        &self.options
    }

    /// Full compaction: filter, build CSR, project coordinates
    pub fn compact(&self, graph: &RoadGraph) -> Result<CompactGraph> {
        self.options.canvas.validate()?;
        self.build_csr(graph)?.project(&self.options.canvas)
    }

    /// Filter and assemble the CSR without projecting coordinates
    pub fn build_csr(&self, graph: &RoadGraph) -> Result<FilteredGraph> {
        let position = index_nodes(graph)?;

        // Resolve endpoints to input positions up front so that a dangling
        // reference fails before anything is built.
        let mut endpoints = Vec::with_capacity(graph.edges.len());
        for (edge_idx, edge) in graph.edges.iter().enumerate() {
            let resolve = |id: &NodeId| {
                position.get(id).copied().ok_or_else(|| Error::Reference {
                    node: id.clone(),
                    edge: edge_idx,
                })
            };
            endpoints.push((resolve(&edge.from)?, resolve(&edge.to)?));
        }

        let mut degree = vec![0u64; graph.nodes.len()];
        for &(u, v) in &endpoints {
            degree[u] += 1;
            degree[v] += 1;
        }

        let min_degree = u64::from(self.options.min_degree);
        let mut dense: Vec<Option<u32>> = vec![None; graph.nodes.len()];
        let mut node_ids = Vec::new();
        let mut coords = Vec::new();
        for (pos, node) in graph.nodes.iter().enumerate() {
            if degree[pos] < min_degree {
                continue;
            }
            let idx = u32::try_from(node_ids.len()).map_err(|_| {
                Error::CapacityExceeded(format!(
                    "more than {} surviving nodes",
                    u32::MAX
                ))
            })?;
            dense[pos] = Some(idx);
            node_ids.push(node.id.clone());
            coords.push((node.lon, node.lat));
        }

        if node_ids.is_empty() {
            return Err(Error::EmptyGraph {
                min_degree: self.options.min_degree,
            });
        }

        let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); node_ids.len()];
        let mut kept_edges = 0usize;
        let mut self_loops = 0usize;
        let resolved = graph.edges.iter().zip(&endpoints).enumerate();
        for (edge_idx, (edge, &(u_pos, v_pos))) in resolved {
            let (Some(u), Some(v)) = (dense[u_pos], dense[v_pos]) else {
                continue;
            };
            let a = &graph.nodes[u_pos];
            let b = &graph.nodes[v_pos];
            let weight = (b.lon - a.lon).hypot(b.lat - a.lat);
            if !weight.is_finite() {
                return Err(Error::NonFiniteWeight { edge: edge_idx });
            }

            adjacency[u as usize].push((v, weight));
            adjacency[v as usize].push((u, weight));

            kept_edges += 1;
            if edge.is_self_loop() {
                self_loops += 1;
            }
        }

        let csr = flatten(adjacency);

        let stats = CompactStats {
            input_nodes: graph.nodes.len(),
            input_edges: graph.edges.len(),
            dropped_nodes: graph.nodes.len() - node_ids.len(),
            dropped_edges: graph.edges.len() - kept_edges,
            self_loops,
        };

        Ok(FilteredGraph {
            csr,
            node_ids,
            coords,
            stats,
        })
    }
}

/// Map each identifier to its position in the input, rejecting duplicates
/// and non-finite coordinates
fn index_nodes(graph: &RoadGraph) -> Result<HashMap<&NodeId, usize>> {
    let mut position = HashMap::with_capacity(graph.nodes.len());
    for (pos, node) in graph.nodes.iter().enumerate() {
        if !node.lon.is_finite() || !node.lat.is_finite() {
            return Err(Error::NonFiniteCoordinate {
                node: node.id.clone(),
                lon: node.lon,
                lat: node.lat,
            });
        }
        if position.insert(&node.id, pos).is_some() {
            return Err(Error::DuplicateNode(node.id.clone()));
        }
    }
    Ok(position)
}

/// Sort each adjacency list by (neighbor, weight) and concatenate
fn flatten(adjacency: Vec<Vec<(u32, f64)>>) -> CsrGraph {
    let total: usize = adjacency.iter().map(Vec::len).sum();
    let mut offsets = Vec::with_capacity(adjacency.len() + 1);
    let mut neighbors = Vec::with_capacity(total);
    let mut weights = Vec::with_capacity(total);

    offsets.push(0u64);
    for mut list in adjacency {
        list.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
        for (neighbor, weight) in list {
            neighbors.push(neighbor);
            weights.push(weight);
        }
        offsets.push(neighbors.len() as u64);
    }

    CsrGraph {
        offsets,
        neighbors,
        weights,
    }
}
