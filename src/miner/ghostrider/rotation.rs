//! Rotation resolution
//!
//! The three memory-hard stages of a chain determine its rotation, the row
//! of the tuning tables used to schedule it. 20 unordered triplets exist;
//! each is listed in both cyclic orientations so that a single pass over 40
//! rows matches any ordering without normalizing first.

use crate::miner::ghostrider::order::{AlgoOrder, HeaderSeed, derive_order, header_seed};
use crate::types::{HEAVY_PER_CHAIN, HeavyAlgo};
use std::fmt;

/// Number of rotation rows
pub const ROTATION_COUNT: usize = 40;

/// Canonical memory-hard triplets, indexed by rotation
///
/// Values index [`HeavyAlgo::ALL`].
#[rustfmt::skip]
pub(crate) const CANONICAL_TRIPLETS: [[u8; HEAVY_PER_CHAIN]; ROTATION_COUNT] = [
    [0, 1, 2], [0, 2, 1], [0, 1, 3], [0, 3, 1], [0, 1, 4],
    [0, 4, 1], [0, 1, 5], [0, 5, 1], [0, 2, 3], [0, 3, 2],
    [0, 2, 4], [0, 4, 2], [0, 2, 5], [0, 5, 2], [0, 3, 4],
    [0, 4, 3], [0, 3, 5], [0, 5, 3], [0, 4, 5], [0, 5, 4],
    [1, 2, 3], [1, 3, 2], [1, 2, 4], [1, 4, 2], [1, 2, 5],
    [1, 5, 2], [1, 3, 4], [1, 4, 3], [1, 3, 5], [1, 5, 3],
    [1, 4, 5], [1, 5, 4], [2, 3, 4], [2, 4, 3], [2, 3, 5],
    [2, 5, 3], [2, 4, 5], [2, 5, 4], [3, 4, 5], [3, 5, 4],
];

/// Index of a tuning-table row (0..40)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RotationId(u8);

impl RotationId {
    /// Wraps a row index, `None` when out of range
    pub fn new(id: usize) -> Option<Self> {
        (id < ROTATION_COUNT).then_some(Self(id as u8))
    }

    /// Row index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Unordered-triplet index (0..20)
    ///
    /// Both orientations of a triplet share this value; pools report it as
    /// the block's CN rotation.
    pub fn cn_rotation(self) -> u8 {
        self.0 / 2
    }

    /// Memory-hard variants of this row, in canonical order
    pub fn triplet(self) -> [HeavyAlgo; HEAVY_PER_CHAIN] {
        CANONICAL_TRIPLETS[self.index()].map(|i| HeavyAlgo::ALL[i as usize])
    }
}

impl fmt::Display for RotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Matches a memory-hard triplet against the canonical rows
///
/// A row matches when it equals the triplet under any cyclic rotation.
/// Returns `None` when no row matches, which distinct triplets never do.
pub fn resolve_triplet(triplet: [HeavyAlgo; HEAVY_PER_CHAIN]) -> Option<RotationId> {
    let [h0, h1, h2] = triplet.map(|h| h.index() as u8);
    CANONICAL_TRIPLETS
        .iter()
        .position(|&row| row == [h0, h1, h2] || row == [h1, h2, h0] || row == [h2, h0, h1])
        .and_then(RotationId::new)
}

/// Resolves the rotation of a derived order
///
/// Only the memory-hard stages at positions 5, 11 and 17 matter; orders that
/// share them resolve to the same row.
pub fn resolve_rotation(order: &AlgoOrder) -> Option<RotationId> {
    resolve_triplet(order.heavy_triplet())
}

/// Resolves a rotation, normalizing the unresolved case to row 0
pub fn resolve_rotation_or_default(order: &AlgoOrder) -> RotationId {
    resolve_rotation(order).unwrap_or_else(|| {
        log::warn!(
            "No tuning row for memory-hard triplet {:?}, using rotation 0",
            order.heavy_triplet()
        );
        RotationId::default()
    })
}

fn cn_rotation_of(seed: &HeaderSeed) -> Option<u8> {
    resolve_rotation(&derive_order(seed)).map(RotationId::cn_rotation)
}

/// CN rotation (0..20) of the block a header builds on
pub fn rotation_from_header(header: &[u8; 80]) -> Option<u8> {
    cn_rotation_of(&header_seed(header))
}

/// CN rotation (0..20) selected by a block hash
pub fn rotation_from_block_hash(block_hash: &[u8; 32]) -> Option<u8> {
    cn_rotation_of(block_hash)
}
