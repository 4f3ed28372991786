//! Level-step precondition and fault errors

use thiserror::Error;

/// Errors raised by a level step
///
/// Every variant except [`KernelError::LaneFault`] is a precondition the
/// orchestrator owns; the kernel checks them up front and refuses to start
/// rather than compute misaligned or out-of-range accesses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Configuration rejected
    #[error("Invalid kernel configuration: {0}")]
    InvalidConfig(String),

    /// Bitset word length not divisible by the lane count
    #[error("{buffer} has {words} words, not divisible by {lanes} lanes")]
    Misaligned {
        /// Which buffer
        buffer: &'static str,
        /// Its word length
        words: usize,
        /// Configured lanes
        lanes: usize,
    },

    /// Visited set shorter than the next frontier it absorbs
    #[error("visited set has {visited} words, next frontier needs {next}")]
    VisitedTooShort {
        /// Visited word length
        visited: usize,
        /// Next-frontier word length
        next: usize,
    },

    /// A neighbor id cannot be addressed in the visited set or next frontier
    #[error("neighbor id {neighbor} outside provisioned bitsets ({bits} bits)")]
    NeighborOutOfRange {
        /// Offending neighbor id
        neighbor: u32,
        /// Smallest provisioned bit length
        bits: usize,
    },

    /// An active node has no CSR row or no level slot
    #[error("active node {node} outside partition ({rows} rows) or level array ({levels} slots)")]
    ActiveNodeOutOfRange {
        /// Offending node id
        node: u32,
        /// CSR rows in the partition
        rows: usize,
        /// Level array length
        levels: usize,
    },

    /// The OS refused to start a lane thread; no lane touched any buffer
    #[error("lane {lane} could not be spawned: {reason}")]
    LaneSpawn {
        /// Lane index
        lane: usize,
        /// OS error text
        reason: String,
    },

    /// A lane panicked; the unit's round is lost
    #[error("lane {lane} faulted during the level step")]
    LaneFault {
        /// Lane index
        lane: usize,
    },
}
