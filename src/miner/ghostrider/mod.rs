// src/miner/ghostrider/mod.rs
//! GhostRider hash chain
//!
//! Each block header selects an 18-stage chain: 15 lightweight hashes and
//! 3 of the 6 memory-hard variants, in an order derived from the header.
//! The selected memory-hard triplet picks a tuning row that decides how the
//! lanes of a multi-lane call are fused.

/// Fused vs. independent dispatch of memory-hard stages
pub mod batch;

/// Per-worker memo of the last derived order
pub mod cache;

/// Per-worker hashing context
pub mod executor;

/// Aligned per-lane working buffer
pub mod lane;

/// Stage order derivation from header bytes
pub mod order;

/// Memory-hard triplet to rotation index
pub mod rotation;

/// Per-rotation tuning tables
pub mod tuning;

pub use self::batch::BatchPlan;
pub use self::cache::{CacheStats, OrderCache, SeedKey};
pub use self::executor::{GhostRider, MAX_LANES};
pub use self::lane::{INPUT_LEN, LaneState, OUTPUT_LEN, STATE_LEN};
pub use self::order::{AlgoOrder, HeaderSeed, derive_order, header_seed};
pub use self::rotation::{
    RotationId, resolve_rotation, resolve_rotation_or_default, rotation_from_block_hash,
    rotation_from_header,
};
pub use self::tuning::{LaneCount, TuningRow, max_scratch_bytes, tuning_row};
