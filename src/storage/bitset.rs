//! Frontier bitsets
//!
//! One bit per global node, packed 32 nodes per word. Node `n` lives at
//! word `n / 32`, bit `n % 32`.
//!
//! Words are `AtomicU32` so that every lane can address the same buffer, the
//! way all lanes of a compute unit address one shared memory region. All word
//! accesses use relaxed ordering: cross-lane visibility is established by the
//! barrier between phases and by the frontier lock, never by the words
//! themselves.

use super::ids::{GlobalNodeId, WORD_BITS};
use std::sync::atomic::{AtomicU32, Ordering};

/// Fixed-size, word-packed bitset over global node ids
///
/// # Example
///
/// ```
/// use frontier_bfs::{FrontierBitset, GlobalNodeId};
///
/// let mut frontier = FrontierBitset::with_nodes(100, 4);
/// assert_eq!(frontier.len_words(), 4); // 100 nodes -> 4 words, already a multiple of 4
///
/// frontier.insert(GlobalNodeId(42));
/// assert!(frontier.contains(GlobalNodeId(42)));
/// assert_eq!(frontier.count_ones(), 1);
/// ```
#[derive(Debug)]
pub struct FrontierBitset {
    words: Box<[AtomicU32]>,
}

impl FrontierBitset {
    /// Allocate `len_words` zeroed words
    #[must_use]
    pub fn with_words(len_words: usize) -> Self {
        Self {
            words: (0..len_words).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    /// Allocate enough words for `num_nodes` nodes, rounded up to a multiple of `lanes`
    ///
    /// This is provisioning-time padding: the kernel itself never resizes.
    #[must_use]
    pub fn with_nodes(num_nodes: usize, lanes: usize) -> Self {
        let words = num_nodes.div_ceil(WORD_BITS);
        let lanes = lanes.max(1);
        Self::with_words(words.div_ceil(lanes) * lanes)
    }

    /// Build from raw words (e.g. a frontier received from another unit)
    #[must_use]
    pub fn from_words(words: &[u32]) -> Self {
        Self {
            words: words.iter().map(|&w| AtomicU32::new(w)).collect(),
        }
    }

    /// Number of words
    #[must_use]
    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    /// Number of addressable node bits
    #[must_use]
    pub fn len_bits(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Test a node's bit
    ///
    /// Nodes beyond `len_bits()` are reported as absent.
    #[must_use]
    pub fn contains(&self, node: GlobalNodeId) -> bool {
        self.words
            .get(node.word_index())
            .is_some_and(|w| w.load(Ordering::Relaxed) & node.bit_mask() != 0)
    }

    /// Set a node's bit (exclusive access, orchestrator side)
    ///
    /// # Panics
    ///
    /// Panics if `node` is beyond `len_bits()`.
    pub fn insert(&mut self, node: GlobalNodeId) {
        let word = self.words[node.word_index()].get_mut();
        *word |= node.bit_mask();
    }

    /// Zero every word
    pub fn clear(&mut self) {
        for w in self.words.iter_mut() {
            *w.get_mut() = 0;
        }
    }

    /// Number of set bits
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    /// True if no bit is set (termination signal for the orchestrator)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| w.load(Ordering::Relaxed) == 0)
    }

    /// Iterate over set nodes in ascending order
    pub fn iter_ones(&self) -> impl Iterator<Item = GlobalNodeId> + '_ {
        self.words.iter().enumerate().flat_map(|(idx, w)| {
            let mut bits = w.load(Ordering::Relaxed);
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros();
                bits &= bits - 1;
                Some(GlobalNodeId::from_position(idx, bit))
            })
        })
    }

    /// Overwrite with `other` (lengths must match)
    ///
    /// # Panics
    ///
    /// Panics if the word lengths differ.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.len_words(), other.len_words(), "bitset length mismatch");
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            *dst.get_mut() = src.load(Ordering::Relaxed);
        }
    }

    /// OR `other` into `self` (lengths must match)
    ///
    /// # Panics
    ///
    /// Panics if the word lengths differ.
    pub fn union_with(&mut self, other: &Self) {
        assert_eq!(self.len_words(), other.len_words(), "bitset length mismatch");
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            *dst.get_mut() |= src.load(Ordering::Relaxed);
        }
    }

    /// Snapshot of the raw words
    #[must_use]
    pub fn words(&self) -> Vec<u32> {
        self.words.iter().map(|w| w.load(Ordering::Relaxed)).collect()
    }

    /// Shared view of the atomic words, for lanes
    pub(crate) fn atomic_words(&self) -> &[AtomicU32] {
        &self.words
    }

    /// Load one word (lane side)
    pub(crate) fn load_word(&self, word: usize) -> u32 {
        self.words[word].load(Ordering::Relaxed)
    }

    /// Store one word (lane side; caller holds ownership of `word` or the frontier lock)
    pub(crate) fn store_word(&self, word: usize, value: u32) {
        self.words[word].store(value, Ordering::Relaxed);
    }
}

impl Clone for FrontierBitset {
    fn clone(&self) -> Self {
        Self::from_words(&self.words())
    }
}

impl PartialEq for FrontierBitset {
    fn eq(&self, other: &Self) -> bool {
        self.len_words() == other.len_words()
            && self
                .words
                .iter()
                .zip(other.words.iter())
                .all(|(a, b)| a.load(Ordering::Relaxed) == b.load(Ordering::Relaxed))
    }
}

impl Eq for FrontierBitset {}
