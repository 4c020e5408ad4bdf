//! Algorithm-order derivation
//!
//! Every block header selects its own chain: the 15 lightweight stages in a
//! header-dependent order, interleaved with 3 of the 6 memory-hard stages at
//! positions 5, 11 and 17. The derivation is a pure function of a 32-byte
//! seed and is total: degenerate seeds fall back to ascending fill.

use crate::types::{
    CHAIN_LENGTH, CORE_COUNT, CoreAlgo, HEAVY_COUNT, HEAVY_PER_CHAIN, HeavyAlgo, StageId,
};
use std::fmt;
use std::ops::Index;

/// Length of the seed the order is derived from
pub const SEED_LEN: usize = 32;

/// Byte offset of the seed inside an 80-byte block header
///
/// The seed is the previous-block hash that follows the 4-byte version.
pub const HEADER_SEED_OFFSET: usize = 4;

/// Chain positions that hold memory-hard stages
pub const HEAVY_POSITIONS: [usize; HEAVY_PER_CHAIN] = [5, 11, 17];

/// Fixed 32-byte window the order is derived from
pub type HeaderSeed = [u8; SEED_LEN];

/// The 18-stage sequence of one chain
///
/// # Invariants
/// - Positions 5, 11 and 17 hold three pairwise distinct memory-hard stages.
/// - Every other position holds a lightweight stage, each exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlgoOrder {
    stages: [StageId; CHAIN_LENGTH],
}

impl AlgoOrder {
    /// Stages in execution order
    pub fn stages(&self) -> &[StageId; CHAIN_LENGTH] {
        &self.stages
    }

    /// Iterates stages in execution order
    pub fn iter(&self) -> impl Iterator<Item = StageId> + '_ {
        self.stages.iter().copied()
    }

    /// Memory-hard stages at positions 5, 11 and 17
    pub fn heavy_triplet(&self) -> [HeavyAlgo; HEAVY_PER_CHAIN] {
        HEAVY_POSITIONS.map(|pos| match self.stages[pos] {
            StageId::Heavy(algo) => algo,
            // Construction only ever places heavy stages here
            StageId::Core(_) => unreachable!("lightweight stage at heavy position {}", pos),
        })
    }

    /// Numeric stage identifiers, the wire form used by other miners
    pub fn ids(&self) -> [u8; CHAIN_LENGTH] {
        self.stages.map(StageId::id)
    }
}

impl Default for AlgoOrder {
    fn default() -> Self {
        derive_order(&[0u8; SEED_LEN])
    }
}

impl Index<usize> for AlgoOrder {
    type Output = StageId;

    fn index(&self, index: usize) -> &StageId {
        &self.stages[index]
    }
}

impl fmt::Display for AlgoOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

/// Picks distinct indices out of `N` candidates from the seed nibbles
///
/// Each byte contributes its low then high nibble, reduced modulo `N`.
/// Already-picked indices are discarded, not retried. Whatever the seed
/// leaves unpicked is appended in ascending order.
fn select<const N: usize>(seed: &HeaderSeed) -> [usize; N] {
    let mut taken = [false; N];
    let mut picks = [0usize; N];
    let mut count = 0;

    for &byte in seed {
        for nibble in [byte & 0x0F, byte >> 4] {
            let candidate = nibble as usize % N;
            if !taken[candidate] {
                taken[candidate] = true;
                picks[count] = candidate;
                count += 1;
            }
        }
        if count == N {
            return picks;
        }
    }

    for (candidate, _) in taken.iter().enumerate().filter(|(_, t)| !**t) {
        picks[count] = candidate;
        count += 1;
    }
    picks
}

/// Derives the chain order from a 32-byte seed
///
/// Lightweight and memory-hard selections are two independent passes over
/// the same nibbles. Only the first three memory-hard picks are used.
pub fn derive_order(seed: &HeaderSeed) -> AlgoOrder {
    let core = select::<CORE_COUNT>(seed);
    let heavy = select::<HEAVY_COUNT>(seed);

    let mut core_picks = core.iter().filter_map(|&i| CoreAlgo::from_index(i));
    let mut heavy_picks = heavy.iter().filter_map(|&i| HeavyAlgo::from_index(i));

    let mut stages = [StageId::Core(CoreAlgo::Blake); CHAIN_LENGTH];
    for (pos, slot) in stages.iter_mut().enumerate() {
        *slot = if pos % 6 == 5 {
            heavy_picks.next().map(StageId::Heavy)
        } else {
            core_picks.next().map(StageId::Core)
        }
        .unwrap_or(*slot);
    }

    AlgoOrder { stages }
}

/// Reads the order seed out of an 80-byte block header
pub fn header_seed(header: &[u8; 80]) -> HeaderSeed {
    let mut seed = [0u8; SEED_LEN];
    seed.copy_from_slice(&header[HEADER_SEED_OFFSET..HEADER_SEED_OFFSET + SEED_LEN]);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_valid(order: &AlgoOrder) {
        let mut core = HashSet::new();
        let mut heavy = HashSet::new();
        for (pos, stage) in order.iter().enumerate() {
            match stage {
                StageId::Heavy(algo) => {
                    assert!(HEAVY_POSITIONS.contains(&pos), "heavy at {}", pos);
                    assert!(heavy.insert(algo), "heavy {} repeated", algo);
                }
                StageId::Core(algo) => {
                    assert!(!HEAVY_POSITIONS.contains(&pos), "core at {}", pos);
                    assert!(core.insert(algo), "core {} repeated", algo);
                }
            }
        }
        assert_eq!(core.len(), CORE_COUNT);
        assert_eq!(heavy.len(), HEAVY_PER_CHAIN);
    }

    #[test]
    fn all_zero_seed_takes_the_ascending_fill_path() {
        let order = derive_order(&[0u8; SEED_LEN]);
        assert_valid(&order);
        // Nibble 0 picks index 0 once, the rest is filled ascending.
        assert_eq!(
            order.ids(),
            [0, 1, 2, 3, 4, 15, 5, 6, 7, 8, 9, 16, 10, 11, 12, 13, 14, 17]
        );
    }

    #[test]
    fn identical_byte_seeds_are_still_valid() {
        for byte in 0..=255u8 {
            assert_valid(&derive_order(&[byte; SEED_LEN]));
        }
    }

    #[test]
    fn nibbles_are_consumed_low_then_high() {
        let mut seed = [0u8; SEED_LEN];
        seed[0] = 0x21;
        let order = derive_order(&seed);
        // Core picks start 1, 2, 0 then fill 3, 4, ...
        assert_eq!(order[0], StageId::Core(CoreAlgo::Bmw));
        assert_eq!(order[1], StageId::Core(CoreAlgo::Groestl));
        assert_eq!(order[2], StageId::Core(CoreAlgo::Blake));
        assert_eq!(
            order.heavy_triplet(),
            [HeavyAlgo::Darklite, HeavyAlgo::Fast, HeavyAlgo::Dark]
        );
    }

    #[test]
    fn derivation_is_pure() {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        for _ in 0..512 {
            let mut seed = [0u8; SEED_LEN];
            for byte in seed.iter_mut() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                *byte = state as u8;
            }
            let order = derive_order(&seed);
            assert_valid(&order);
            assert_eq!(order, derive_order(&seed));
        }
    }

    #[test]
    fn seed_is_read_after_the_version_word() {
        let mut header = [0u8; 80];
        for (i, b) in header.iter_mut().enumerate() {
            *b = i as u8;
        }
        let seed = header_seed(&header);
        assert_eq!(seed[0], 4);
        assert_eq!(seed[31], 35);
    }

    #[test]
    fn display_joins_stage_names() {
        let order = AlgoOrder::default();
        let text = order.to_string();
        assert!(text.starts_with("blake > bmw > groestl"));
        assert!(text.ends_with("whirlpool > cn/fast"));
    }
}
