//! Lane partitioner
//!
//! Lane `i` owns the `i`-th equal block of words in each frontier bitset.
//! Assignment is purely positional, so a plan is reproducible.

use super::KernelError;
use crate::storage::WORD_BITS;
use std::ops::Range;

/// Word ranges owned by one lane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneRange {
    /// Lane index
    pub lane: usize,

    /// Next-frontier words this lane rotates into the visited set
    pub next_frontier: Range<usize>,

    /// Current-frontier words this lane expands
    pub current_frontier: Range<usize>,
}

impl LaneRange {
    /// First global node covered by this lane's current-frontier words
    #[must_use]
    pub fn first_node(&self) -> usize {
        self.current_frontier.start * WORD_BITS
    }

    /// Global node range covered by this lane's current-frontier words
    #[must_use]
    pub fn node_range(&self) -> Range<usize> {
        self.first_node()..self.current_frontier.end * WORD_BITS
    }
}

/// Per-lane split of the two frontier bitsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePlan {
    lanes: usize,
    nf_words_per_lane: usize,
    cf_words_per_lane: usize,
}

impl LanePlan {
    /// Split `nf_words` next-frontier words and `cf_words` current-frontier words over `lanes`
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Misaligned` if either length is not an exact multiple
    /// of `lanes`, and `KernelError::InvalidConfig` if `lanes` is zero
    pub fn new(nf_words: usize, cf_words: usize, lanes: usize) -> Result<Self, KernelError> {
        if lanes == 0 {
            return Err(KernelError::InvalidConfig("lanes must be positive".into()));
        }
        for (buffer, words) in [("next frontier", nf_words), ("current frontier", cf_words)] {
            if words % lanes != 0 {
                return Err(KernelError::Misaligned {
                    buffer,
                    words,
                    lanes,
                });
            }
        }

        Ok(Self {
            lanes,
            nf_words_per_lane: nf_words / lanes,
            cf_words_per_lane: cf_words / lanes,
        })
    }

    /// Number of lanes
    #[must_use]
    pub const fn lanes(&self) -> usize {
        self.lanes
    }

    /// Current-frontier nodes owned by each lane
    #[must_use]
    pub const fn nodes_per_lane(&self) -> usize {
        self.cf_words_per_lane * WORD_BITS
    }

    /// Ranges for one lane
    #[must_use]
    pub fn lane(&self, lane: usize) -> LaneRange {
        let nf = lane * self.nf_words_per_lane;
        let cf = lane * self.cf_words_per_lane;
        LaneRange {
            lane,
            next_frontier: nf..nf + self.nf_words_per_lane,
            current_frontier: cf..cf + self.cf_words_per_lane,
        }
    }

    /// All lane ranges in lane order
    pub fn ranges(&self) -> impl Iterator<Item = LaneRange> + '_ {
        (0..self.lanes).map(|lane| self.lane(lane))
    }
}
