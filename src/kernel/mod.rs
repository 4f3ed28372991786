//! Level-propagation kernel
//!
//! One level step of a level-synchronous BFS on one compute unit: a fixed set
//! of lanes splits the frontier bitsets positionally, rotates the previous
//! round's discoveries into the visited set, meets at a barrier, then expands
//! the current frontier into the next one.
//!
//! # Architecture
//!
//! - `config`: lane count and lock layout, fixed at launch
//! - `partition`: positional split of bitset words across lanes
//! - `lock`: the next-frontier lock (coarse or sharded)
//! - `context`: the buffers of one invocation
//! - `step`: the compute unit and the lane body

mod config;
mod context;
mod error;
mod lock;
mod partition;
mod step;

pub use config::{KernelConfig, LockStrategy, DEFAULT_LANES, MAX_LANES};
pub use context::LevelContext;
pub use error::KernelError;
pub use lock::FrontierLock;
pub use partition::{LanePlan, LaneRange};
pub use step::{ComputeUnit, LevelStats};
