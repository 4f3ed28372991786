//! Next-frontier lock
//!
//! Expansion sets next-frontier bits with a plain load/OR/store on the shared
//! word. That read-modify-write is only safe under a lock: two lanes OR-ing
//! different bits into the same word without one would lose an update.
//!
//! Correctness needs atomicity per word, not one global critical section, so
//! the lock may be sharded as long as a word always maps to the same shard.

use super::{KernelError, LockStrategy};
use crate::storage::FrontierBitset;
use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

#[derive(Debug)]
enum Guards {
    Coarse(Mutex<()>),
    Sharded {
        shards: Box<[CachePadded<Mutex<()>>]>,
        words_per_shard: usize,
    },
}

/// Lock guarding every write to the next frontier
#[derive(Debug)]
pub struct FrontierLock {
    guards: Guards,
}

impl FrontierLock {
    /// Build a lock for a next frontier of `nf_words` words
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidConfig` for a sharded lock with zero shards
    pub fn new(strategy: LockStrategy, nf_words: usize) -> Result<Self, KernelError> {
        let guards = match strategy {
            LockStrategy::Coarse => Guards::Coarse(Mutex::new(())),
            LockStrategy::Sharded { shards: 0 } => {
                return Err(KernelError::InvalidConfig(
                    "sharded lock needs at least one shard".into(),
                ));
            }
            LockStrategy::Sharded { shards } => Guards::Sharded {
                shards: (0..shards).map(|_| CachePadded::new(Mutex::new(()))).collect(),
                words_per_shard: nf_words.div_ceil(shards).max(1),
            },
        };
        Ok(Self { guards })
    }

    /// Number of independent locks
    #[must_use]
    pub fn shard_count(&self) -> usize {
        match &self.guards {
            Guards::Coarse(_) => 1,
            Guards::Sharded { shards, .. } => shards.len(),
        }
    }

    /// OR `mask` into `word` of `bitset` under the lock guarding that word
    pub fn or_word(&self, bitset: &FrontierBitset, word: usize, mask: u32) {
        let mutex = match &self.guards {
            Guards::Coarse(mutex) => mutex,
            Guards::Sharded {
                shards,
                words_per_shard,
            } => &shards[(word / words_per_shard).min(shards.len() - 1)],
        };

        let _guard = mutex.lock();
        let current = bitset.load_word(word);
        bitset.store_word(word, current | mask);
    }
}
