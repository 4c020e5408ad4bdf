//! Empirical scheduling tables
//!
//! For every rotation and lane count a row records how the lanes of each
//! memory-hard stage are grouped into fused kernel calls, and whether the
//! rotation runs the double-iteration variants. The tables were measured
//! for cache and TLB behavior; they are data, not derived.

use crate::miner::ghostrider::rotation::{ROTATION_COUNT, RotationId};
use crate::types::{HEAVY_COUNT, HeavyAlgo};
use crate::utils::error::GhostRiderError;
use lazy_static::lazy_static;
use std::fmt;

/// Scratch is provisioned in multiples of one 2 MiB huge page
pub const PAGE_SIZE: usize = 2 * 1024 * 1024;

/// Column of the heavy-iteration flag in a raw row
const HEAVY_FLAG: usize = HEAVY_COUNT;

type RawTable = [[u8; HEAVY_COUNT + 1]; ROTATION_COUNT];

// Columns: turtlelite, turtle, darklite, dark, lite, fast, heavy flag
#[rustfmt::skip]
const TUNE_2WAY: RawTable = [
    [0, 0, 2, 2, 0, 0, 0], [0, 0, 2, 2, 0, 0, 0], [0, 0, 2, 2, 2, 0, 0],
    [0, 0, 2, 2, 2, 0, 0], [0, 2, 2, 2, 0, 0, 1], [0, 2, 2, 2, 0, 0, 1],
    [2, 0, 2, 2, 0, 0, 1], [2, 0, 2, 2, 0, 0, 1], [0, 0, 0, 2, 2, 0, 0],
    [0, 0, 0, 2, 2, 0, 0], [0, 2, 0, 2, 0, 0, 0], [0, 2, 0, 2, 0, 0, 0],
    [2, 0, 0, 2, 0, 0, 0], [2, 0, 0, 2, 0, 0, 0], [0, 2, 0, 2, 2, 0, 0],
    [0, 2, 0, 2, 2, 0, 0], [2, 0, 0, 2, 2, 0, 0], [2, 0, 0, 2, 2, 0, 0],
    [2, 2, 0, 2, 0, 0, 1], [2, 2, 0, 2, 0, 0, 1], [0, 0, 2, 0, 2, 0, 0],
    [0, 0, 2, 0, 2, 0, 0], [0, 2, 2, 0, 0, 0, 0], [0, 2, 2, 0, 0, 0, 0],
    [2, 0, 2, 0, 0, 0, 0], [2, 0, 2, 0, 0, 0, 0], [0, 2, 2, 0, 2, 0, 0],
    [0, 2, 2, 0, 2, 0, 0], [2, 0, 2, 0, 2, 0, 0], [2, 0, 2, 0, 2, 0, 0],
    [2, 2, 2, 0, 0, 0, 1], [2, 2, 2, 0, 0, 0, 1], [0, 2, 0, 0, 2, 0, 0],
    [0, 2, 0, 0, 2, 0, 0], [2, 0, 0, 0, 2, 0, 0], [2, 0, 0, 0, 2, 0, 0],
    [2, 2, 0, 0, 0, 0, 0], [2, 2, 0, 0, 0, 0, 0], [2, 2, 0, 0, 2, 0, 0],
    [2, 2, 0, 0, 2, 0, 0],
];

#[rustfmt::skip]
const TUNE_3WAY: RawTable = [
    [0, 0, 3, 3, 0, 0, 0], [0, 0, 3, 3, 0, 0, 0], [0, 0, 3, 3, 3, 0, 0],
    [0, 0, 3, 3, 3, 0, 0], [0, 3, 3, 3, 0, 0, 1], [0, 3, 3, 3, 0, 0, 1],
    [3, 0, 3, 3, 0, 0, 1], [3, 0, 3, 3, 0, 0, 1], [0, 0, 0, 3, 3, 0, 0],
    [0, 0, 0, 3, 3, 0, 0], [0, 3, 0, 3, 0, 0, 0], [0, 3, 0, 3, 0, 0, 0],
    [3, 0, 0, 3, 0, 0, 0], [3, 0, 0, 3, 0, 0, 0], [0, 3, 0, 3, 3, 0, 0],
    [0, 3, 0, 3, 3, 0, 0], [3, 0, 0, 3, 3, 0, 0], [3, 0, 0, 3, 3, 0, 0],
    [3, 3, 0, 3, 0, 0, 1], [3, 3, 0, 3, 0, 0, 1], [0, 0, 3, 0, 3, 0, 0],
    [0, 0, 3, 0, 3, 0, 0], [0, 3, 3, 0, 0, 0, 0], [0, 3, 3, 0, 0, 0, 0],
    [3, 0, 3, 0, 0, 0, 0], [3, 0, 3, 0, 0, 0, 0], [0, 3, 3, 0, 3, 0, 0],
    [0, 3, 3, 0, 3, 0, 0], [3, 0, 3, 0, 3, 0, 0], [3, 0, 3, 0, 3, 0, 0],
    [3, 3, 3, 0, 0, 0, 1], [3, 3, 3, 0, 0, 0, 1], [0, 3, 0, 0, 3, 0, 0],
    [0, 3, 0, 0, 3, 0, 0], [3, 0, 0, 0, 3, 0, 0], [3, 0, 0, 0, 3, 0, 0],
    [3, 3, 0, 0, 0, 0, 0], [3, 3, 0, 0, 0, 0, 0], [3, 3, 0, 0, 3, 0, 0],
    [3, 3, 0, 0, 3, 0, 0],
];

#[rustfmt::skip]
const TUNE_4WAY: RawTable = [
    [0, 0, 4, 4, 0, 0, 0], [0, 0, 4, 4, 0, 0, 0], [0, 0, 4, 4, 2, 0, 0],
    [0, 0, 4, 4, 2, 0, 0], [0, 4, 4, 4, 0, 0, 1], [0, 4, 4, 4, 0, 0, 1],
    [4, 0, 4, 4, 0, 0, 1], [4, 0, 4, 4, 0, 0, 1], [0, 0, 0, 4, 2, 0, 0],
    [0, 0, 0, 4, 2, 0, 0], [0, 4, 0, 4, 0, 0, 0], [0, 4, 0, 4, 0, 0, 0],
    [4, 0, 0, 4, 0, 0, 0], [4, 0, 0, 4, 0, 0, 0], [0, 4, 0, 4, 2, 0, 0],
    [0, 4, 0, 4, 2, 0, 0], [4, 0, 0, 4, 2, 0, 0], [4, 0, 0, 4, 2, 0, 0],
    [4, 4, 0, 4, 0, 0, 1], [4, 4, 0, 4, 0, 0, 1], [0, 0, 4, 0, 2, 0, 0],
    [0, 0, 4, 0, 2, 0, 0], [0, 4, 4, 0, 0, 0, 0], [0, 4, 4, 0, 0, 0, 0],
    [4, 0, 4, 0, 0, 0, 0], [4, 0, 4, 0, 0, 0, 0], [0, 4, 4, 0, 2, 0, 0],
    [0, 4, 4, 0, 2, 0, 0], [4, 0, 4, 0, 2, 0, 0], [4, 0, 4, 0, 2, 0, 0],
    [4, 4, 4, 0, 0, 0, 1], [4, 4, 4, 0, 0, 0, 1], [0, 4, 0, 0, 2, 0, 0],
    [0, 4, 0, 0, 2, 0, 0], [4, 0, 0, 0, 2, 0, 0], [4, 0, 0, 0, 2, 0, 0],
    [4, 4, 0, 0, 0, 0, 0], [4, 4, 0, 0, 0, 0, 0], [4, 4, 0, 0, 2, 0, 0],
    [4, 4, 0, 0, 2, 0, 0],
];

/// Number of lanes hashed together in one call
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneCount {
    /// Single lane
    One = 1,
    /// Two lanes
    Two = 2,
    /// Three lanes
    Three = 3,
    /// Four lanes
    Four = 4,
}

impl LaneCount {
    /// Every supported lane count
    pub const ALL: [LaneCount; 4] = [
        LaneCount::One,
        LaneCount::Two,
        LaneCount::Three,
        LaneCount::Four,
    ];

    /// Number of lanes
    #[inline]
    pub fn get(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for LaneCount {
    type Error = GhostRiderError;

    fn try_from(lanes: usize) -> Result<Self, Self::Error> {
        match lanes {
            1 => Ok(LaneCount::One),
            2 => Ok(LaneCount::Two),
            3 => Ok(LaneCount::Three),
            4 => Ok(LaneCount::Four),
            other => Err(GhostRiderError::LaneCount(other)),
        }
    }
}

impl fmt::Display for LaneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-way", self.get())
    }
}

/// Raw-table column of a memory-hard variant (lightest to heaviest)
const fn column(algo: HeavyAlgo) -> usize {
    match algo {
        HeavyAlgo::Turtlelite => 0,
        HeavyAlgo::Turtle => 1,
        HeavyAlgo::Darklite => 2,
        HeavyAlgo::Dark => 3,
        HeavyAlgo::Lite => 4,
        HeavyAlgo::Fast => 5,
    }
}

/// Scheduling parameters of one rotation at one lane count
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TuningRow {
    widths: [u8; HEAVY_COUNT],
    heavy: bool,
}

impl TuningRow {
    fn from_raw(raw: &[u8; HEAVY_COUNT + 1]) -> Self {
        let mut widths = [0u8; HEAVY_COUNT];
        widths.copy_from_slice(&raw[..HEAVY_COUNT]);
        Self {
            widths,
            heavy: raw[HEAVY_FLAG] != 0,
        }
    }

    /// Lanes per fused call for a memory-hard stage, 1 meaning independent
    #[inline]
    pub fn batch_width(&self, algo: HeavyAlgo) -> usize {
        (self.widths[column(algo)] as usize).max(1)
    }

    /// Whether this rotation runs the double-iteration variants
    #[inline]
    pub fn heavy(&self) -> bool {
        self.heavy
    }

    /// Huge pages the widest fused call of this row needs
    pub fn pages(&self) -> usize {
        HeavyAlgo::ALL
            .into_iter()
            .map(|algo| (self.batch_width(algo) * algo.scratch_bytes()).div_ceil(PAGE_SIZE))
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Scratch bytes this row needs, rounded to whole pages
    pub fn scratch_bytes(&self) -> usize {
        self.pages() * PAGE_SIZE
    }
}

impl fmt::Display for TuningRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for algo in HeavyAlgo::ALL {
            write!(f, "{}x{} ", algo, self.batch_width(algo))?;
        }
        write!(f, "pages={}", self.pages())?;
        if self.heavy {
            write!(f, " heavy")?;
        }
        Ok(())
    }
}

fn table(lanes: LaneCount) -> Option<&'static RawTable> {
    match lanes {
        LaneCount::One => None,
        LaneCount::Two => Some(&TUNE_2WAY),
        LaneCount::Three => Some(&TUNE_3WAY),
        LaneCount::Four => Some(&TUNE_4WAY),
    }
}

/// Row for a rotation at a lane count
///
/// Single-lane execution has no table of its own: every stage runs
/// independently and the heavy flag is the rotation's, which is the same
/// in every measured table.
pub fn tuning_row(lanes: LaneCount, rotation: RotationId) -> TuningRow {
    match table(lanes) {
        Some(raw) => TuningRow::from_raw(&raw[rotation.index()]),
        None => TuningRow {
            widths: [1; HEAVY_COUNT],
            heavy: TUNE_2WAY[rotation.index()][HEAVY_FLAG] != 0,
        },
    }
}

fn compute_max_scratch_bytes() -> usize {
    LaneCount::ALL
        .into_iter()
        .flat_map(|lanes| {
            (0..ROTATION_COUNT)
                .filter_map(RotationId::new)
                .map(move |rotation| tuning_row(lanes, rotation).scratch_bytes())
        })
        .max()
        .unwrap_or(PAGE_SIZE)
}

lazy_static! {
    static ref MAX_SCRATCH_BYTES: usize = compute_max_scratch_bytes();
}

/// Worst-case scratch requirement across every rotation and lane count
///
/// Computed once on first use.
pub fn max_scratch_bytes() -> usize {
    *MAX_SCRATCH_BYTES
}
