//! Engine configuration.

use std::time::Duration;

use sealgate_core::constants::{
    DEFAULT_CLEANUP_INTERVAL, DEFAULT_HASHRATE_EXPIRY, DEFAULT_INTAKE_CAPACITY,
    DEFAULT_RESULTS_CAPACITY, DEFAULT_STALE_THRESHOLD,
};

/// Configuration for a [`Sealer`](crate::Sealer) instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Slots per intake channel on the remote handle (at least 1).
    pub intake_capacity: usize,
    /// Blocks a pending task stays acceptable after newer work arrives.
    pub stale_threshold: u64,
    /// Age after which a miner's hash-rate report stops counting.
    pub hashrate_expiry: Duration,
    /// Period of the worker's housekeeping tick.
    pub cleanup_interval: Duration,
    /// Capacity of the accepted-solutions channel.
    pub results_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            intake_capacity: DEFAULT_INTAKE_CAPACITY,
            stale_threshold: DEFAULT_STALE_THRESHOLD,
            hashrate_expiry: DEFAULT_HASHRATE_EXPIRY,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            results_capacity: DEFAULT_RESULTS_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stale_threshold() {
        assert_eq!(EngineConfig::default().stale_threshold, 7);
    }

    #[test]
    fn default_hashrate_expiry_exceeds_cleanup_interval() {
        let cfg = EngineConfig::default();
        assert!(cfg.hashrate_expiry > cfg.cleanup_interval);
    }

    #[test]
    fn default_capacities_are_nonzero() {
        let cfg = EngineConfig::default();
        assert!(cfg.intake_capacity > 0);
        assert!(cfg.results_capacity > 0);
    }

    #[test]
    fn struct_update_syntax() {
        let cfg = EngineConfig {
            stale_threshold: 2,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.stale_threshold, 2);
        assert_eq!(cfg.intake_capacity, DEFAULT_INTAKE_CAPACITY);
    }
}
