//! Protocol and engine constants.

use std::time::Duration;

/// Number of text fields in a work package handed to external miners.
pub const WORK_PACKAGE_FIELDS: usize = 11;

/// Capacity of each intake channel on the remote handle.
///
/// A capacity of one is the closest a bounded tokio channel gets to a
/// rendezvous: a second sender waits until the worker drains the first.
pub const DEFAULT_INTAKE_CAPACITY: usize = 1;

/// How many blocks a pending work package stays acceptable after newer work
/// has been pushed.
pub const DEFAULT_STALE_THRESHOLD: u64 = 7;

/// Remote hash-rate reports older than this are dropped from the aggregate.
pub const DEFAULT_HASHRATE_EXPIRY: Duration = Duration::from_secs(10);

/// Interval of the worker's housekeeping tick (rate expiry, stale work purge).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5);

/// Capacity of the channel carrying accepted solutions out of the engine.
pub const DEFAULT_RESULTS_CAPACITY: usize = 16;

/// Default TCP port of the JSON-RPC server.
pub const DEFAULT_RPC_PORT: u16 = 8545;
