//! Compute-unit configuration

use super::KernelError;

/// Default lane count (one reference compute unit runs 16 lanes)
pub const DEFAULT_LANES: usize = 16;

/// Upper bound on lanes per unit; each lane is an OS thread per level step
pub const MAX_LANES: usize = 1024;

/// How writes to the next frontier are serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStrategy {
    /// One lock for the whole next frontier
    #[default]
    Coarse,

    /// `shards` locks, each guarding a contiguous block of words
    Sharded {
        /// Number of lock shards
        shards: usize,
    },
}

/// Compute-unit configuration, fixed at launch
///
/// # Example
///
/// ```
/// use frontier_bfs::{KernelConfig, LockStrategy};
///
/// let config = KernelConfig::default()
///     .with_lanes(4)
///     .with_lock(LockStrategy::Sharded { shards: 8 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Number of concurrently running lanes
    pub lanes: usize,

    /// Next-frontier lock layout
    pub lock: LockStrategy,
}

impl KernelConfig {
    /// Set the lane count
    #[must_use]
    pub const fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = lanes;
        self
    }

    /// Set the lock strategy
    #[must_use]
    pub const fn with_lock(mut self, lock: LockStrategy) -> Self {
        self.lock = lock;
        self
    }

    /// Reject zero lanes, more than `MAX_LANES` lanes, or zero lock shards
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidConfig` describing the first problem found
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.lanes == 0 {
            return Err(KernelError::InvalidConfig("lanes must be positive".into()));
        }
        if self.lanes > MAX_LANES {
            return Err(KernelError::InvalidConfig(format!(
                "{} lanes exceeds the limit of {MAX_LANES}",
                self.lanes
            )));
        }
        if let LockStrategy::Sharded { shards: 0 } = self.lock {
            return Err(KernelError::InvalidConfig(
                "sharded lock needs at least one shard".into(),
            ));
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            lock: LockStrategy::Coarse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KernelConfig::default();
        assert_eq!(config.lanes, DEFAULT_LANES);
        assert_eq!(config.lock, LockStrategy::Coarse);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let config = KernelConfig::default().with_lanes(0);
        assert!(matches!(
            config.validate(),
            Err(KernelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_lane_cap() {
        assert!(KernelConfig::default().with_lanes(MAX_LANES).validate().is_ok());
        assert!(matches!(
            KernelConfig::default().with_lanes(MAX_LANES + 1).validate(),
            Err(KernelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_shards() {
        let config = KernelConfig::default().with_lock(LockStrategy::Sharded { shards: 0 });
        assert!(config.validate().is_err());
    }
}
