//! Node identifiers
//!
//! Two address spaces coexist during a level step:
//!
//! - [`LocalNodeId`] indexes rows of a [`CsrPartition`](super::CsrPartition)
//! - [`GlobalNodeId`] indexes frontier bitsets, the visited set and the level array
//!
//! They are deliberately distinct types. Neighbor ids stored in a partition are
//! always global.

/// Bits per frontier word
pub const WORD_BITS: usize = 32;

/// Partition-local node identifier (CSR row index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalNodeId(pub u32);

/// Global node identifier (bitset / level array index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalNodeId(pub u32);

impl LocalNodeId {
    /// Build from a (word, bit) position in a frontier bitset
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Bitsets are capped at u32::MAX bits
    pub const fn from_position(word: usize, bit: u32) -> Self {
        Self((word * WORD_BITS) as u32 + bit)
    }

    /// Row index into the CSR offsets array
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Global id of a node driving expansion.
    ///
    /// A partition's row range is a prefix of the global id space, so the mapping
    /// is the identity.
    #[must_use]
    pub const fn as_global(self) -> GlobalNodeId {
        GlobalNodeId(self.0)
    }
}

impl GlobalNodeId {
    /// Build from a (word, bit) position
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Bitsets are capped at u32::MAX bits
    pub const fn from_position(word: usize, bit: u32) -> Self {
        Self((word * WORD_BITS) as u32 + bit)
    }

    /// Index into the level array
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Word holding this node's bit
    #[must_use]
    pub const fn word_index(self) -> usize {
        self.0 as usize / WORD_BITS
    }

    /// Single-bit mask of this node within its word
    #[must_use]
    pub const fn bit_mask(self) -> u32 {
        1 << (self.0 % WORD_BITS as u32)
    }
}
