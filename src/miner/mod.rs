// src/miner/mod.rs
//! Core hashing functionality
//!
//! This module contains all components of the GhostRider hash:
//! - Stage capabilities and the suite binding them to identifiers
//! - Order derivation, tuning and the multi-lane executor
//! - Scratch memory for the memory-hard stages
//! - Worker thread management

/// Hash stage capabilities
///
/// Defines the lightweight and memory-hard stage traits and the
/// [`HashSuite`] lookup table the executor dispatches through.
pub mod algorithm;

/// GhostRider chain: order, rotation, tuning, memo and executor
pub mod ghostrider;

/// Scratch arena and huge-page support
pub mod memory;

/// Worker thread implementation
///
/// Contains the worker logic that scans nonce ranges with its own
/// hashing context and reports hash counts.
pub mod worker;

/// Worker pool sized and tuned from the configuration
pub mod scheduler;

// Re-export main components for cleaner imports
pub use self::algorithm::{CoreHash, HashSuite, HeavyHash};
pub use self::ghostrider::{AlgoOrder, GhostRider, LaneCount, RotationId};
pub use self::memory::{ArenaOptions, ScratchArena};
pub use self::scheduler::WorkerPool;
pub use self::worker::Worker;
