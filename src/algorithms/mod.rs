//! Graph algorithms
//!
//! Level-synchronous BFS driven through the level-step kernel, plus sequential
//! baselines used to check it.

pub mod traversal;

pub use traversal::{bfs, bfs_levels, BfsLevels, LevelSyncBfs, UNREACHED};
