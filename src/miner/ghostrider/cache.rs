//! Per-worker memo of the last derived order
//!
//! Consecutive hashes of one job share their header apart from the nonce,
//! so deriving the order on every call is wasted work. The memo is keyed on
//! the block time and the first two words of the previous-block hash; a
//! change in any of the three forces recomputation.

use crate::miner::ghostrider::order::{AlgoOrder, derive_order, header_seed};
use crate::miner::ghostrider::rotation::{RotationId, resolve_rotation_or_default};

/// Header fields that decide whether the memo is still valid
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SeedKey {
    /// Block time (header word 17)
    pub ntime: u32,
    /// Header word 1
    pub word1: u32,
    /// Header word 2
    pub word2: u32,
}

impl SeedKey {
    /// Reads the key fields (little-endian words) out of a header
    pub fn from_header(header: &[u8; 80]) -> Self {
        let word = |i: usize| {
            u32::from_le_bytes([
                header[4 * i],
                header[4 * i + 1],
                header[4 * i + 2],
                header[4 * i + 3],
            ])
        };
        Self {
            ntime: word(17),
            word1: word(1),
            word2: word(2),
        }
    }
}

/// Hit and miss counters of an [`OrderCache`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the memo
    pub hits: u64,
    /// Lookups that derived a new order
    pub misses: u64,
}

/// Memo of (key, order, rotation) owned by one worker
#[derive(Debug, Default)]
pub struct OrderCache {
    entry: Option<(SeedKey, AlgoOrder, RotationId)>,
    stats: CacheStats,
}

impl OrderCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Order and rotation for a header, derived only when the key changed
    pub fn resolve(&mut self, header: &[u8; 80]) -> (AlgoOrder, RotationId) {
        let key = SeedKey::from_header(header);
        if let Some((cached, order, rotation)) = self.entry {
            if cached == key {
                self.stats.hits += 1;
                return (order, rotation);
            }
        }

        self.stats.misses += 1;
        let order = derive_order(&header_seed(header));
        let rotation = resolve_rotation_or_default(&order);
        log::debug!(
            "Derived order for ntime {:#010x}: [{}] rotation {}",
            key.ntime,
            order,
            rotation
        );
        self.entry = Some((key, order, rotation));
        (order, rotation)
    }

    /// Forgets the memoized order
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Hit and miss counters since creation
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
