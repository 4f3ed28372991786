//! frontier-bfs: lane-parallel level-synchronous BFS
//!
//! # Overview
//!
//! frontier-bfs runs breadth-first search one level at a time over a CSR graph
//! partition. Each level step is executed by a fixed set of concurrent lanes on
//! a compute unit, over bitset frontiers (32 nodes per word) that every lane
//! addresses directly.
//!
//! # Quick Start
//!
//! ```
//! use frontier_bfs::{CsrGraph, GlobalNodeId, KernelConfig, LevelSyncBfs};
//!
//! # fn main() -> frontier_bfs::Result<()> {
//! // 0 → 1, 0 → 2, 1 → 2, 2 → 3
//! let edges = [(0, 1), (0, 2), (1, 2), (2, 3)].map(|(s, d)| (GlobalNodeId(s), GlobalNodeId(d)));
//! let graph = CsrGraph::from_edge_list(&edges)?;
//!
//! // Two compute units of four lanes each
//! let mut bfs = LevelSyncBfs::new(&graph, 2, KernelConfig::default().with_lanes(4))?;
//! let result = bfs.run(GlobalNodeId(0))?;
//!
//! assert_eq!(result.levels, vec![0, 1, 1, 2]);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: node id types, frontier bitsets, CSR graphs and partitions
//! - **Persistence**: Parquet-backed edge lists (`storage` feature)
//! - **Kernel**: the level step (rotate, barrier, expand) run by every lane
//! - **Algorithms**: the host orchestrator driving level steps to termination

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod kernel;
pub mod storage;

// Re-export core types
pub use algorithms::{bfs, bfs_levels, BfsLevels, LevelSyncBfs, UNREACHED};
pub use kernel::{
    ComputeUnit, FrontierLock, KernelConfig, KernelError, LanePlan, LaneRange, LevelContext,
    LevelStats, LockStrategy, DEFAULT_LANES, MAX_LANES,
};
pub use storage::{CsrGraph, CsrPartition, FrontierBitset, GlobalNodeId, LocalNodeId, WORD_BITS};

// Error type
pub use anyhow::{Error, Result};
