//! CSR (Compressed Sparse Row) graph and per-unit partitions
//!
//! # CSR Format
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2, 2 → 3
//!
//! CSR:
//!   offsets:   [0, 2, 3, 4, 4]  // Node 0: edges [0..2), Node 1: [2..3), Node 2: [3..4), Node 3: [4..4)
//!   neighbors: [1, 2, 2, 3]     // Edge targets (global ids)
//! ```
//!
//! [`CsrGraph`] is the host-side whole graph. [`CsrPartition`] is the read-only
//! adjacency handed to one compute unit for a level step.

use super::ids::{GlobalNodeId, LocalNodeId};
use anyhow::{anyhow, ensure, Result};
use std::ops::Range;

/// CSR graph (whole graph, host side)
///
/// # Example
///
/// ```
/// use frontier_bfs::{CsrGraph, GlobalNodeId};
///
/// let mut graph = CsrGraph::new();
/// graph.add_edge(GlobalNodeId(0), GlobalNodeId(1)).unwrap();
/// graph.add_edge(GlobalNodeId(0), GlobalNodeId(2)).unwrap();
///
/// let neighbors = graph.outgoing_neighbors(GlobalNodeId(0)).unwrap();
/// assert_eq!(neighbors.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// node i's edges start at `offsets`[i]
    /// Length: `num_nodes` + 1
    offsets: Vec<u32>,

    /// Edge targets
    /// Length: `num_edges`
    neighbors: Vec<u32>,

    num_nodes: usize,
}

impl CsrGraph {
    /// Create new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            neighbors: Vec::new(),
            num_nodes: 0,
        }
    }

    /// Create graph from edge list
    ///
    /// # Errors
    ///
    /// Returns error if the edge count overflows the 32-bit offset space
    pub fn from_edge_list(edges: &[(GlobalNodeId, GlobalNodeId)]) -> Result<Self> {
        if edges.is_empty() {
            return Ok(Self::new());
        }
        ensure!(
            u32::try_from(edges.len()).is_ok(),
            "{} edges exceed the 32-bit offset space",
            edges.len()
        );

        let max_node = edges
            .iter()
            .flat_map(|(src, dst)| [src.0, dst.0])
            .max()
            .ok_or_else(|| anyhow!("Empty edge list"))?;

        let num_nodes = max_node as usize + 1;

        // Counting sort by source keeps per-node edge order stable
        let mut degrees = vec![0_u32; num_nodes];
        for (src, _) in edges {
            degrees[src.index()] += 1;
        }

        let mut offsets = Vec::with_capacity(num_nodes + 1);
        let mut offset = 0_u32;
        offsets.push(offset);
        for degree in &degrees {
            offset += degree;
            offsets.push(offset);
        }

        let mut cursor: Vec<u32> = offsets[..num_nodes].to_vec();
        let mut neighbors = vec![0_u32; edges.len()];
        for (src, dst) in edges {
            let slot = &mut cursor[src.index()];
            neighbors[*slot as usize] = dst.0;
            *slot += 1;
        }

        Ok(Self {
            offsets,
            neighbors,
            num_nodes,
        })
    }

    /// Add edge to graph (dynamic insertion)
    ///
    /// Note: For large graphs, use `from_edge_list` for better performance.
    ///
    /// # Errors
    ///
    /// Returns error if the edge count would overflow the 32-bit offset space
    pub fn add_edge(&mut self, src: GlobalNodeId, dst: GlobalNodeId) -> Result<()> {
        ensure!(
            self.neighbors.len() < u32::MAX as usize,
            "edge count exceeds the 32-bit offset space"
        );

        let max_node = src.0.max(dst.0) as usize;
        if max_node >= self.num_nodes {
            self.expand_to(max_node + 1);
        }

        let src_idx = src.index();
        let end = self.offsets[src_idx + 1] as usize;
        self.neighbors.insert(end, dst.0);

        for offset in &mut self.offsets[src_idx + 1..] {
            *offset += 1;
        }

        Ok(())
    }

    /// Get outgoing neighbors of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn outgoing_neighbors(&self, node: GlobalNodeId) -> Result<&[u32]> {
        if node.index() >= self.num_nodes {
            return Err(anyhow!("Node ID {} out of bounds", node.0));
        }

        let idx = node.index();
        let start = self.offsets[idx] as usize;
        let end = self.offsets[idx + 1] as usize;

        Ok(&self.neighbors[start..end])
    }

    /// Get number of nodes
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Get number of edges
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.neighbors.len()
    }

    /// Iterate over (source, target) edges in CSR order
    pub fn iter_edges(&self) -> impl Iterator<Item = (GlobalNodeId, GlobalNodeId)> + '_ {
        self.offsets.windows(2).enumerate().flat_map(move |(src, w)| {
            #[allow(clippy::cast_possible_truncation)] // num_nodes fits u32 by construction
            let src = GlobalNodeId(src as u32);
            self.neighbors[w[0] as usize..w[1] as usize]
                .iter()
                .map(move |&dst| (src, GlobalNodeId(dst)))
        })
    }

    /// Get CSR components (offsets, neighbors)
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32]) {
        (&self.offsets, &self.neighbors)
    }

    /// Split into `units` partitions over contiguous node blocks
    ///
    /// Every partition spans the full node-id space so that its row ids are valid
    /// global ids; it carries only the out-edges of the nodes in its block, all
    /// other rows are empty.
    ///
    /// # Errors
    ///
    /// Returns error if `units` is zero
    pub fn partition(&self, units: usize) -> Result<Vec<CsrPartition>> {
        ensure!(units > 0, "partition count must be positive");

        let block = self.num_nodes.div_ceil(units);
        Ok((0..units)
            .map(|unit| {
                let start = (unit * block).min(self.num_nodes);
                let end = (start + block).min(self.num_nodes);
                self.owned_rows(start..end)
            })
            .collect())
    }

    fn owned_rows(&self, owned: Range<usize>) -> CsrPartition {
        let first = self.offsets[owned.start];
        let last = self.offsets[owned.end];

        let offsets = (0..=self.num_nodes)
            .map(|row| self.offsets[row.clamp(owned.start, owned.end)] - first)
            .collect();
        let neighbors = self.neighbors[first as usize..last as usize].to_vec();

        CsrPartition {
            max_neighbor: neighbors.iter().copied().max(),
            offsets,
            neighbors,
            owned,
        }
    }

    /// Expand graph to accommodate new nodes
    fn expand_to(&mut self, new_size: usize) {
        if new_size <= self.num_nodes {
            return;
        }

        let last_offset = *self.offsets.last().unwrap_or(&0);
        self.offsets
            .extend(std::iter::repeat(last_offset).take(new_size - self.num_nodes));

        self.num_nodes = new_size;
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only adjacency partition for one compute unit
///
/// `offsets` has `local_count + 1` entries; `neighbors[offsets[i]..offsets[i + 1]]`
/// are the out-edges of local node `i`, as global ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrPartition {
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
    owned: Range<usize>,
    max_neighbor: Option<u32>,
}

impl CsrPartition {
    /// Build from raw CSR arrays
    ///
    /// # Errors
    ///
    /// Returns error if `offsets` is empty, does not start at zero, decreases, or
    /// does not end at `neighbors.len()`
    pub fn from_raw_parts(offsets: Vec<u32>, neighbors: Vec<u32>) -> Result<Self> {
        ensure!(!offsets.is_empty(), "offsets must hold local_count + 1 entries");
        ensure!(offsets[0] == 0, "offsets must start at 0, found {}", offsets[0]);
        if let Some(row) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(anyhow!(
                "offsets decrease at row {row}: {} > {}",
                offsets[row],
                offsets[row + 1]
            ));
        }
        let last = offsets[offsets.len() - 1] as usize;
        ensure!(
            last == neighbors.len(),
            "last offset {last} does not match {} neighbors",
            neighbors.len()
        );

        let owned = 0..offsets.len() - 1;
        Ok(Self {
            max_neighbor: neighbors.iter().copied().max(),
            offsets,
            neighbors,
            owned,
        })
    }

    /// Number of CSR rows
    #[must_use]
    pub fn local_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of edges held by this partition
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.neighbors.len()
    }

    /// Rows whose out-edges this partition carries
    #[must_use]
    pub fn owned_rows(&self) -> Range<usize> {
        self.owned.clone()
    }

    /// Out-edges of a local node (global ids)
    ///
    /// # Panics
    ///
    /// Panics if `node` is not below `local_count()`.
    #[must_use]
    pub fn neighbors(&self, node: LocalNodeId) -> &[u32] {
        let start = self.offsets[node.index()] as usize;
        let end = self.offsets[node.index() + 1] as usize;
        &self.neighbors[start..end]
    }

    /// Largest neighbor id referenced, if any edge exists
    #[must_use]
    pub fn max_neighbor(&self) -> Option<GlobalNodeId> {
        self.max_neighbor.map(GlobalNodeId)
    }

    /// Raw CSR arrays (offsets, neighbors)
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32]) {
        (&self.offsets, &self.neighbors)
    }
}
