//! Graph traversal: level-synchronous BFS over compute units, plus sequential baselines
//!
//! Based on Ligra (Shun & Blelloch, `PPoPP` 2013) frontier-based traversal patterns.
//!
//! [`LevelSyncBfs`] is the host side of the level-step kernel: it partitions the
//! graph, provisions every unit's buffers, runs one level step per unit per
//! round, merges and broadcasts next frontiers, and stops once a round
//! discovers nothing.

use crate::kernel::{ComputeUnit, KernelConfig, LevelContext, LevelStats};
use crate::storage::{CsrGraph, CsrPartition, FrontierBitset, GlobalNodeId};
use anyhow::{ensure, Context, Result};
use std::collections::{HashSet, VecDeque};
use std::thread;

/// Level value of a node never reached
pub const UNREACHED: u32 = u32::MAX;

/// Result of a level-synchronous BFS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfsLevels {
    /// Discovery level per node (`UNREACHED` if never reached)
    pub levels: Vec<u32>,

    /// Number of level steps run (including the final, empty-result one)
    pub rounds: u32,

    /// Number of nodes reached
    pub visited_count: usize,

    /// Work counters per round, summed over units
    pub round_stats: Vec<LevelStats>,
}

impl BfsLevels {
    /// Level of a specific node
    #[must_use]
    pub fn level(&self, node: GlobalNodeId) -> Option<u32> {
        self.levels
            .get(node.index())
            .copied()
            .filter(|&l| l != UNREACHED)
    }

    /// Check if node is reachable from source
    #[must_use]
    pub fn is_reachable(&self, node: GlobalNodeId) -> bool {
        self.level(node).is_some()
    }
}

/// Buffers one unit keeps for the whole BFS
#[derive(Debug)]
struct UnitBuffers {
    partition: CsrPartition,
    kernel: ComputeUnit,
    visited: FrontierBitset,
    next: FrontierBitset,
    levels: Vec<u32>,
}

/// Level-synchronous BFS orchestrator over one or more compute units
///
/// # Example
///
/// ```
/// use frontier_bfs::{CsrGraph, GlobalNodeId, KernelConfig, LevelSyncBfs};
///
/// let mut graph = CsrGraph::new();
/// graph.add_edge(GlobalNodeId(0), GlobalNodeId(1)).unwrap();
/// graph.add_edge(GlobalNodeId(1), GlobalNodeId(2)).unwrap();
///
/// let config = KernelConfig::default().with_lanes(2);
/// let mut bfs = LevelSyncBfs::new(&graph, 2, config).unwrap();
/// let result = bfs.run(GlobalNodeId(0)).unwrap();
///
/// assert_eq!(result.level(GlobalNodeId(2)), Some(2));
/// assert_eq!(result.visited_count, 3);
/// ```
#[derive(Debug)]
pub struct LevelSyncBfs {
    units: Vec<UnitBuffers>,
    num_nodes: usize,
    words: usize,
}

impl LevelSyncBfs {
    /// Partition `graph` over `units` compute units and provision their buffers
    ///
    /// Bitsets are sized to the node count, padded to a whole multiple of the
    /// lane count in words.
    ///
    /// # Errors
    ///
    /// Returns error if `units` is zero or the kernel configuration is invalid
    pub fn new(graph: &CsrGraph, units: usize, config: KernelConfig) -> Result<Self> {
        config.validate().context("Invalid kernel configuration")?;

        let num_nodes = graph.num_nodes();
        let words = FrontierBitset::with_nodes(num_nodes, config.lanes).len_words();

        let units: Vec<UnitBuffers> = graph
            .partition(units)?
            .into_iter()
            .map(|partition| -> Result<UnitBuffers> {
                Ok(UnitBuffers {
                    partition,
                    kernel: ComputeUnit::new(config, words)?,
                    visited: FrontierBitset::with_words(words),
                    next: FrontierBitset::with_words(words),
                    levels: vec![UNREACHED; num_nodes],
                })
            })
            .collect::<Result<_>>()?;

        tracing::debug!(
            units = units.len(),
            lanes = config.lanes,
            nodes = num_nodes,
            words,
            "provisioned BFS units"
        );

        Ok(Self {
            units,
            num_nodes,
            words,
        })
    }

    /// Number of compute units
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Run a full BFS from `source`
    ///
    /// Buffers are reset first, so a single orchestrator can serve many runs.
    ///
    /// # Errors
    ///
    /// Returns error if `source` is out of range or any unit faults
    pub fn run(&mut self, source: GlobalNodeId) -> Result<BfsLevels> {
        ensure!(
            source.index() < self.num_nodes,
            "Source node {} out of bounds ({} nodes)",
            source.0,
            self.num_nodes
        );

        // The source rides in as leftover "previous round" content, so the first
        // rotate folds it into the visited set and it is never rediscovered.
        for unit in &mut self.units {
            unit.visited.clear();
            unit.next.clear();
            unit.next.insert(source);
            unit.levels.fill(UNREACHED);
        }

        let mut current = FrontierBitset::with_words(self.words);
        current.insert(source);
        let mut merged = FrontierBitset::with_words(self.words);

        let mut level = 0_u32;
        let mut round_stats = Vec::new();

        loop {
            round_stats.push(self.run_round(&current, level)?);

            merged.clear();
            for unit in &self.units {
                merged.union_with(&unit.next);
            }
            if self.units.len() > 1 {
                for unit in &mut self.units {
                    unit.next.copy_from(&merged);
                }
            }

            if merged.is_empty() {
                break;
            }

            std::mem::swap(&mut current, &mut merged);
            level += 1;
            ensure!(
                level as usize <= self.num_nodes,
                "BFS exceeded {} levels; frontier never drained",
                self.num_nodes
            );
        }

        let levels = self.collect_levels();
        let visited_count = levels.iter().filter(|&&l| l != UNREACHED).count();

        tracing::info!(
            source = source.0,
            rounds = level + 1,
            visited = visited_count,
            "BFS terminated"
        );

        Ok(BfsLevels {
            levels,
            rounds: level + 1,
            visited_count,
            round_stats,
        })
    }

    /// One level step on every unit, units running concurrently
    fn run_round(&mut self, current: &FrontierBitset, level: u32) -> Result<LevelStats> {
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = self
                .units
                .iter_mut()
                .map(|unit| {
                    s.spawn(move || {
                        unit.kernel.level_step(LevelContext {
                            partition: &unit.partition,
                            current,
                            visited: &mut unit.visited,
                            next: &mut unit.next,
                            levels: &mut unit.levels,
                            level,
                        })
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(thread::ScopedJoinHandle::join)
                .collect()
        });

        let mut total = LevelStats::default();
        for (idx, result) in results.into_iter().enumerate() {
            let stats = result
                .map_err(|_| anyhow::anyhow!("unit {idx} panicked"))?
                .with_context(|| format!("unit {idx} failed at level {level}"))?;
            total += stats;
        }
        Ok(total)
    }

    /// Every unit sees the same merged frontier, so their level arrays agree on
    /// every reached node; take the minimum to tolerate any unit that lags.
    fn collect_levels(&self) -> Vec<u32> {
        let mut levels = vec![UNREACHED; self.num_nodes];
        for unit in &self.units {
            for (dst, &src) in levels.iter_mut().zip(&unit.levels) {
                *dst = (*dst).min(src);
            }
        }
        levels
    }
}

/// Sequential level-by-level BFS returning the discovery level of every node
///
/// # Errors
///
/// Returns an error if graph operations fail (e.g., invalid node access).
///
/// # Example
///
/// ```
/// use frontier_bfs::{bfs_levels, CsrGraph, GlobalNodeId, UNREACHED};
///
/// let mut graph = CsrGraph::new();
/// graph.add_edge(GlobalNodeId(0), GlobalNodeId(1)).unwrap();
/// graph.add_edge(GlobalNodeId(2), GlobalNodeId(1)).unwrap();
///
/// let levels = bfs_levels(&graph, GlobalNodeId(0)).unwrap();
/// assert_eq!(levels, vec![0, 1, UNREACHED]);
/// ```
pub fn bfs_levels(graph: &CsrGraph, source: GlobalNodeId) -> Result<Vec<u32>> {
    ensure!(
        source.index() < graph.num_nodes(),
        "Source node {} out of bounds",
        source.0
    );

    let mut levels = vec![UNREACHED; graph.num_nodes()];
    let mut queue = VecDeque::new();

    levels[source.index()] = 0;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let next_level = levels[current.index()] + 1;
        for &neighbor in graph.outgoing_neighbors(current)? {
            let slot = &mut levels[neighbor as usize];
            if *slot == UNREACHED {
                *slot = next_level;
                queue.push_back(GlobalNodeId(neighbor));
            }
        }
    }

    Ok(levels)
}

/// Breadth-First Search from source node
///
/// Standard BFS traversal returning all reachable nodes.
///
/// # Errors
///
/// Returns an error if graph operations fail (e.g., invalid node access).
///
/// # Example
///
/// ```
/// use frontier_bfs::{bfs, CsrGraph, GlobalNodeId};
///
/// let mut graph = CsrGraph::new();
/// graph.add_edge(GlobalNodeId(0), GlobalNodeId(1)).unwrap();
/// graph.add_edge(GlobalNodeId(1), GlobalNodeId(2)).unwrap();
///
/// let reachable = bfs(&graph, GlobalNodeId(0)).unwrap();
/// assert_eq!(reachable.len(), 3); // All 3 nodes reachable
/// ```
pub fn bfs(graph: &CsrGraph, source: GlobalNodeId) -> Result<Vec<u32>> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    queue.push_back(source.0);
    visited.insert(source.0);

    while let Some(current) = queue.pop_front() {
        let neighbors = graph.outgoing_neighbors(GlobalNodeId(current))?;

        for &neighbor in neighbors {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    Ok(visited.into_iter().collect())
}
