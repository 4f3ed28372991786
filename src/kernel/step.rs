//! Level step: one BFS level on one compute unit
//!
//! Every lane runs the same body:
//!
//! ```text
//! Start → Rotate → Barrier → Expand → Done
//! ```
//!
//! - **Rotate**: for each next-frontier word the lane owns, OR it into the
//!   visited set and zero it. Ranges are disjoint, so no lock.
//! - **Barrier**: Expand reads visited words owned by any lane, so every lane
//!   must finish Rotate first.
//! - **Expand**: for each active node the lane owns, record its level, then for
//!   each out-neighbor not yet visited, set its next-frontier bit under the
//!   frontier lock.
//!
//! The visited test in Expand is unlocked. Two lanes may both see a neighbor as
//! unvisited and both set its bit; the OR is idempotent so the result is the
//! same as a single update.
//!
//! Lanes hold at a launch gate until every lane has been spawned. If the OS
//! refuses a thread, the gate is closed and the lanes already running return
//! without touching the barrier or any buffer.

use super::{FrontierLock, KernelConfig, KernelError, LaneRange, LanePlan, LevelContext};
use crate::storage::{CsrPartition, FrontierBitset, GlobalNodeId, LocalNodeId};
use parking_lot::RwLock;
use std::ops::AddAssign;
use std::sync::atomic::Ordering;
use std::sync::Barrier;
use std::thread;

/// Work counters for one level step, summed over lanes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Nodes expanded (set bits in the current frontier)
    pub active_nodes: usize,

    /// Out-edges inspected
    pub edges_scanned: usize,

    /// Next-frontier lock acquisitions (includes redundant racing updates)
    pub lock_acquisitions: usize,
}

impl AddAssign for LevelStats {
    fn add_assign(&mut self, rhs: Self) {
        self.active_nodes += rhs.active_nodes;
        self.edges_scanned += rhs.edges_scanned;
        self.lock_acquisitions += rhs.lock_acquisitions;
    }
}

/// One compute unit: a fixed set of lanes sharing a barrier and a frontier lock
///
/// # Example
///
/// ```
/// use frontier_bfs::{ComputeUnit, CsrPartition, FrontierBitset, GlobalNodeId, KernelConfig, LevelContext};
///
/// // 0 → 1, 0 → 2, 1 → 2, 2 → 3
/// let partition = CsrPartition::from_raw_parts(vec![0, 2, 3, 4, 4], vec![1, 2, 2, 3]).unwrap();
/// let config = KernelConfig::default().with_lanes(1);
/// let mut unit = ComputeUnit::new(config, 1).unwrap();
///
/// let mut current = FrontierBitset::with_words(1);
/// current.insert(GlobalNodeId(0));
/// let mut visited = FrontierBitset::with_words(1);
/// let mut next = FrontierBitset::with_words(1);
/// let mut levels = vec![u32::MAX; 4];
///
/// unit.level_step(LevelContext {
///     partition: &partition,
///     current: &current,
///     visited: &mut visited,
///     next: &mut next,
///     levels: &mut levels,
///     level: 0,
/// })
/// .unwrap();
///
/// assert_eq!(levels[0], 0);
/// assert!(next.contains(GlobalNodeId(1)) && next.contains(GlobalNodeId(2)));
/// ```
#[derive(Debug)]
pub struct ComputeUnit {
    config: KernelConfig,
    barrier: Barrier,
    lock: FrontierLock,
}

impl ComputeUnit {
    /// Launch a unit for next frontiers of `nf_words` words
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidConfig` if the configuration is rejected
    pub fn new(config: KernelConfig, nf_words: usize) -> Result<Self, KernelError> {
        config.validate()?;
        Ok(Self {
            config,
            barrier: Barrier::new(config.lanes),
            lock: FrontierLock::new(config.lock, nf_words)?,
        })
    }

    /// Unit configuration
    #[must_use]
    pub const fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Run one level step over the buffers in `ctx`
    ///
    /// On success the visited set has absorbed the entry content of `ctx.next`,
    /// `ctx.next` holds exactly this round's discoveries, and every node active
    /// in `ctx.current` has level `ctx.level`.
    ///
    /// # Errors
    ///
    /// Returns a precondition error before any lane starts,
    /// `KernelError::LaneSpawn` if a lane thread could not be created (buffers
    /// are then untouched), or `KernelError::LaneFault` if a lane panicked
    /// (buffers are then undefined)
    pub fn level_step(&mut self, ctx: LevelContext<'_>) -> Result<LevelStats, KernelError> {
        self.level_step_with(ctx, lane_builder)
    }

    fn level_step_with<B>(
        &mut self,
        ctx: LevelContext<'_>,
        builder: B,
    ) -> Result<LevelStats, KernelError>
    where
        B: Fn(usize) -> thread::Builder,
    {
        let plan = LanePlan::new(
            ctx.next.len_words(),
            ctx.current.len_words(),
            self.config.lanes,
        )?;
        ctx.check()?;

        let LevelContext {
            partition,
            current,
            visited,
            next,
            levels,
            level,
        } = ctx;
        let (visited, next) = (&*visited, &*next);
        let (barrier, lock) = (&self.barrier, &self.lock);

        let mut level_slices = levels.chunks_mut(plan.nodes_per_lane().max(1));

        // `true` once launch has been aborted
        let gate = RwLock::new(false);

        let stats = thread::scope(|s| {
            let mut handles = Vec::with_capacity(plan.lanes());
            let mut spawn_error = None;

            let mut launch = gate.write();
            for range in plan.ranges() {
                let id = range.lane;
                let lane = Lane {
                    range,
                    partition,
                    current,
                    visited,
                    next,
                    levels: level_slices.next().unwrap_or_default(),
                    level,
                    barrier,
                    lock,
                };
                let gate = &gate;
                match builder(id).spawn_scoped(s, move || lane.run(gate)) {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        *launch = true;
                        spawn_error = Some(KernelError::LaneSpawn {
                            lane: id,
                            reason: err.to_string(),
                        });
                        break;
                    }
                }
            }
            drop(launch);

            // Join every lane before reporting, so no panic is left unobserved
            let joined: Vec<_> = handles.into_iter().map(thread::ScopedJoinHandle::join).collect();
            if let Some(err) = spawn_error {
                return Err(err);
            }

            let mut total = LevelStats::default();
            for (lane, result) in joined.into_iter().enumerate() {
                total += result.map_err(|_| KernelError::LaneFault { lane })?;
            }
            Ok::<_, KernelError>(total)
        })?;

        tracing::debug!(
            level,
            lanes = plan.lanes(),
            active = stats.active_nodes,
            edges = stats.edges_scanned,
            locks = stats.lock_acquisitions,
            "level step complete"
        );
        Ok(stats)
    }
}

struct Lane<'a> {
    range: LaneRange,
    partition: &'a CsrPartition,
    current: &'a FrontierBitset,
    visited: &'a FrontierBitset,
    next: &'a FrontierBitset,
    levels: &'a mut [u32],
    level: u32,
    barrier: &'a Barrier,
    lock: &'a FrontierLock,
}

fn lane_builder(lane: usize) -> thread::Builder {
    thread::Builder::new().name(format!("bfs-lane-{lane}"))
}

impl Lane<'_> {
    fn run(mut self, gate: &RwLock<bool>) -> LevelStats {
        if *gate.read() {
            return LevelStats::default();
        }
        self.rotate();
        self.barrier.wait();
        self.expand()
    }

    fn rotate(&self) {
        let words = self.range.next_frontier.clone();
        let visited = &self.visited.atomic_words()[words.clone()];
        let next = &self.next.atomic_words()[words];

        // Lane-exclusive words: plain load/store
        for (seen, fresh) in visited.iter().zip(next) {
            let merged = seen.load(Ordering::Relaxed) | fresh.load(Ordering::Relaxed);
            seen.store(merged, Ordering::Relaxed);
            fresh.store(0, Ordering::Relaxed);
        }

        tracing::trace!(lane = self.range.lane, words = ?self.range.next_frontier, "rotated");
    }

    fn expand(&mut self) -> LevelStats {
        let mut stats = LevelStats::default();
        let first_node = self.range.first_node();

        for word in self.range.current_frontier.clone() {
            let mut bits = self.current.load_word(word);
            while bits != 0 {
                let bit = bits.trailing_zeros();
                bits &= bits - 1;

                let row = LocalNodeId::from_position(word, bit);
                let node = row.as_global();
                self.levels[node.index() - first_node] = self.level;
                stats.active_nodes += 1;

                for &neighbor in self.partition.neighbors(row) {
                    stats.edges_scanned += 1;
                    let neighbor = GlobalNodeId(neighbor);
                    let (idx, mask) = (neighbor.word_index(), neighbor.bit_mask());
                    if self.visited.load_word(idx) & mask == 0 {
                        self.lock.or_word(self.next, idx, mask);
                        stats.lock_acquisitions += 1;
                    }
                }
            }
        }

        tracing::trace!(lane = self.range.lane, active = stats.active_nodes, "expanded");
        stats
    }
}
