//! GhostRider - multi-lane proof-of-work hash core in Rust
//!
//! This crate provides the GhostRider hash chain with support for:
//! - Per-block stage order derivation and rotation resolution
//! - One to four lanes per call with table-driven fusion of the
//!   memory-hard stages
//! - Huge-page backed scratch memory with transparent fallback
//! - Worker threads and hashrate reporting
//!
//! The stage implementations themselves are supplied through a
//! [`HashSuite`].

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Hashing core: stage capabilities, chain executor, scratch memory, workers
pub mod miner;

/// Statistics collection and reporting functionality
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{
    AlgoOrder, ArenaOptions, CoreHash, GhostRider, HashSuite, HeavyHash, LaneCount, RotationId,
    ScratchArena, Worker, WorkerPool,
};
pub use stats::{HashStats, StatsReporter};
pub use types::{CoreAlgo, HeavyAlgo, StageId};
pub use utils::{GhostRiderError, Result, init_logging};
