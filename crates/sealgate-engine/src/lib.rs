//! # sealgate-engine — Remote sealing engine.
//!
//! [`Sealer`] owns the remote handle and spawns the worker loop that drains
//! its intake channels: serving the current work package, checking submitted
//! solutions against pending work, and aggregating miner hash-rate reports.
//! Accepted solutions leave the engine on a results channel.

pub mod config;
pub mod sealer;
mod worker;

pub use config::EngineConfig;
pub use sealer::Sealer;
