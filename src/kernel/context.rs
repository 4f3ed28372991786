//! Invocation context
//!
//! Everything one level step touches, handed over by the orchestrator for the
//! duration of the call. The kernel holds no state of its own between calls.

use super::KernelError;
use crate::storage::{CsrPartition, FrontierBitset};

/// Buffers and scalars for one level step
///
/// `visited`, `next` and `levels` are borrowed exclusively: nothing else may
/// observe them while lanes are running.
#[derive(Debug)]
pub struct LevelContext<'a> {
    /// Adjacency partition of this unit
    pub partition: &'a CsrPartition,

    /// Nodes active at `level`
    pub current: &'a FrontierBitset,

    /// Running visited set (monotonic)
    pub visited: &'a mut FrontierBitset,

    /// Previous round's discoveries on entry, this round's on exit
    pub next: &'a mut FrontierBitset,

    /// Discovery level per node
    pub levels: &'a mut [u32],

    /// Current level counter (read-only)
    pub level: u32,
}

impl LevelContext<'_> {
    /// Check the buffer preconditions the lanes rely on
    ///
    /// Word-length divisibility is checked by [`LanePlan`](super::LanePlan).
    pub(crate) fn check(&self) -> Result<(), KernelError> {
        if self.visited.len_words() < self.next.len_words() {
            return Err(KernelError::VisitedTooShort {
                visited: self.visited.len_words(),
                next: self.next.len_words(),
            });
        }

        if let Some(max) = self.partition.max_neighbor() {
            let bits = self.visited.len_bits().min(self.next.len_bits());
            if max.index() >= bits {
                return Err(KernelError::NeighborOutOfRange {
                    neighbor: max.0,
                    bits,
                });
            }
        }

        let rows = self.partition.local_count();
        let levels = self.levels.len();
        if let Some(node) = self
            .current
            .iter_ones()
            .find(|node| node.index() >= rows || node.index() >= levels)
        {
            return Err(KernelError::ActiveNodeOutOfRange {
                node: node.0,
                rows,
                levels,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GlobalNodeId;

    fn partition() -> CsrPartition {
        CsrPartition::from_raw_parts(vec![0, 2, 3, 4, 4], vec![1, 2, 2, 3]).unwrap()
    }

    #[test]
    fn test_check_accepts_well_formed_buffers() {
        let part = partition();
        let mut current = FrontierBitset::with_words(1);
        current.insert(GlobalNodeId(0));
        let mut visited = FrontierBitset::with_words(1);
        let mut next = FrontierBitset::with_words(1);
        let mut levels = vec![u32::MAX; 4];

        let ctx = LevelContext {
            partition: &part,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 0,
        };
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn test_check_rejects_short_visited() {
        let part = partition();
        let current = FrontierBitset::with_words(2);
        let mut visited = FrontierBitset::with_words(1);
        let mut next = FrontierBitset::with_words(2);
        let mut levels = vec![0; 4];

        let ctx = LevelContext {
            partition: &part,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 0,
        };
        assert_eq!(
            ctx.check(),
            Err(KernelError::VisitedTooShort {
                visited: 1,
                next: 2
            })
        );
    }

    #[test]
    fn test_check_rejects_unaddressable_neighbor() {
        let part = CsrPartition::from_raw_parts(vec![0, 1], vec![40]).unwrap();
        let current = FrontierBitset::with_words(1);
        let mut visited = FrontierBitset::with_words(1);
        let mut next = FrontierBitset::with_words(1);
        let mut levels = vec![0; 1];

        let ctx = LevelContext {
            partition: &part,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 0,
        };
        assert_eq!(
            ctx.check(),
            Err(KernelError::NeighborOutOfRange {
                neighbor: 40,
                bits: 32
            })
        );
    }

    #[test]
    fn test_check_rejects_active_node_without_row() {
        let part = partition();
        let mut current = FrontierBitset::with_words(1);
        current.insert(GlobalNodeId(9));
        let mut visited = FrontierBitset::with_words(1);
        let mut next = FrontierBitset::with_words(1);
        let mut levels = vec![0; 32];

        let ctx = LevelContext {
            partition: &part,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 0,
        };
        assert!(matches!(
            ctx.check(),
            Err(KernelError::ActiveNodeOutOfRange { node: 9, rows: 4, .. })
        ));
    }
}
