// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of lightweight (512-bit digest) stages in every chain
pub const CORE_COUNT: usize = 15;

/// Number of memory-hard variants a block can draw from
pub const HEAVY_COUNT: usize = 6;

/// Number of memory-hard variants that participate in a single chain
pub const HEAVY_PER_CHAIN: usize = 3;

/// Total number of stages in a chain (15 core + 3 heavy)
pub const CHAIN_LENGTH: usize = CORE_COUNT + HEAVY_PER_CHAIN;

/// Lightweight cryptographic hash functions used as chain stages
///
/// Every variant emits a 512-bit digest. The discriminant is the stable
/// stage identifier used by the order derivation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CoreAlgo {
    /// BLAKE-512
    Blake = 0,
    /// Blue Midnight Wish 512
    Bmw,
    /// Grøstl-512
    Groestl,
    /// JH-512
    Jh,
    /// Keccak-512 (pre-SHA3 padding)
    Keccak,
    /// Skein-512-512
    Skein,
    /// Luffa-512
    Luffa,
    /// CubeHash-512
    CubeHash,
    /// SHAvite-3 512
    Shavite,
    /// SIMD-512
    Simd,
    /// ECHO-512
    Echo,
    /// Hamsi-512
    Hamsi,
    /// Fugue-512
    Fugue,
    /// Shabal-512
    Shabal,
    /// Whirlpool
    Whirlpool,
}

impl CoreAlgo {
    /// All lightweight stages in identifier order
    pub const ALL: [CoreAlgo; CORE_COUNT] = [
        CoreAlgo::Blake,
        CoreAlgo::Bmw,
        CoreAlgo::Groestl,
        CoreAlgo::Jh,
        CoreAlgo::Keccak,
        CoreAlgo::Skein,
        CoreAlgo::Luffa,
        CoreAlgo::CubeHash,
        CoreAlgo::Shavite,
        CoreAlgo::Simd,
        CoreAlgo::Echo,
        CoreAlgo::Hamsi,
        CoreAlgo::Fugue,
        CoreAlgo::Shabal,
        CoreAlgo::Whirlpool,
    ];

    /// Position of this algorithm within [`CoreAlgo::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up a lightweight stage by its index (0..15)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase algorithm name
    pub fn name(self) -> &'static str {
        match self {
            CoreAlgo::Blake => "blake",
            CoreAlgo::Bmw => "bmw",
            CoreAlgo::Groestl => "groestl",
            CoreAlgo::Jh => "jh",
            CoreAlgo::Keccak => "keccak",
            CoreAlgo::Skein => "skein",
            CoreAlgo::Luffa => "luffa",
            CoreAlgo::CubeHash => "cubehash",
            CoreAlgo::Shavite => "shavite",
            CoreAlgo::Simd => "simd",
            CoreAlgo::Echo => "echo",
            CoreAlgo::Hamsi => "hamsi",
            CoreAlgo::Fugue => "fugue",
            CoreAlgo::Shabal => "shabal",
            CoreAlgo::Whirlpool => "whirlpool",
        }
    }
}

/// Memory-hard (CryptoNight family) variants
///
/// Exactly three of the six participate in any given chain. The
/// discriminant is the index into the heavy selection set; the stage
/// identifier is offset by [`CORE_COUNT`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HeavyAlgo {
    /// CryptoNight Dark
    Dark = 0,
    /// CryptoNight Darklite
    Darklite,
    /// CryptoNight Fast
    Fast,
    /// CryptoNight Lite
    Lite,
    /// CryptoNight Turtle
    Turtle,
    /// CryptoNight Turtlelite
    Turtlelite,
}

impl HeavyAlgo {
    /// All memory-hard variants in identifier order
    pub const ALL: [HeavyAlgo; HEAVY_COUNT] = [
        HeavyAlgo::Dark,
        HeavyAlgo::Darklite,
        HeavyAlgo::Fast,
        HeavyAlgo::Lite,
        HeavyAlgo::Turtle,
        HeavyAlgo::Turtlelite,
    ];

    /// Position of this variant within [`HeavyAlgo::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up a memory-hard variant by its index (0..6)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Scratch memory one lane of this variant needs
    ///
    /// These are the per-lane footprints of the CryptoNight parameter sets;
    /// fused calls need one footprint per lane they cover.
    pub const fn scratch_bytes(self) -> usize {
        match self {
            HeavyAlgo::Dark | HeavyAlgo::Darklite => 512 * 1024,
            HeavyAlgo::Fast => 2 * 1024 * 1024,
            HeavyAlgo::Lite => 1024 * 1024,
            HeavyAlgo::Turtle | HeavyAlgo::Turtlelite => 256 * 1024,
        }
    }

    /// Lowercase variant name as used by pools (`cn/dark`, ...)
    pub fn name(self) -> &'static str {
        match self {
            HeavyAlgo::Dark => "cn/dark",
            HeavyAlgo::Darklite => "cn/darklite",
            HeavyAlgo::Fast => "cn/fast",
            HeavyAlgo::Lite => "cn/lite",
            HeavyAlgo::Turtle => "cn/turtle",
            HeavyAlgo::Turtlelite => "cn/turtlelite",
        }
    }
}

/// One stage of the GhostRider chain
///
/// Stage identifiers are 0..15 for lightweight stages and 15..21 for the
/// memory-hard ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageId {
    /// Lightweight 512-bit hash stage
    Core(CoreAlgo),
    /// Memory-hard stage
    Heavy(HeavyAlgo),
}

impl StageId {
    /// Number of distinct stage identifiers
    pub const COUNT: usize = CORE_COUNT + HEAVY_COUNT;

    /// Numeric stage identifier (0..21)
    pub fn id(self) -> u8 {
        match self {
            StageId::Core(algo) => algo as u8,
            StageId::Heavy(algo) => CORE_COUNT as u8 + algo as u8,
        }
    }

    /// Inverse of [`StageId::id`]
    pub fn from_id(id: u8) -> Option<Self> {
        let id = id as usize;
        if id < CORE_COUNT {
            CoreAlgo::from_index(id).map(StageId::Core)
        } else {
            HeavyAlgo::from_index(id - CORE_COUNT).map(StageId::Heavy)
        }
    }

    /// Returns `true` for memory-hard stages
    pub fn is_heavy(self) -> bool {
        matches!(self, StageId::Heavy(_))
    }
}

impl From<CoreAlgo> for StageId {
    fn from(algo: CoreAlgo) -> Self {
        StageId::Core(algo)
    }
}

impl From<HeavyAlgo> for StageId {
    fn from(algo: HeavyAlgo) -> Self {
        StageId::Heavy(algo)
    }
}

impl fmt::Display for CoreAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for HeavyAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageId::Core(algo) => algo.fmt(f),
            StageId::Heavy(algo) => algo.fmt(f),
        }
    }
}

impl FromStr for CoreAlgo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        CoreAlgo::ALL
            .into_iter()
            .find(|algo| algo.name() == wanted)
            .ok_or_else(|| format!("Unknown core algorithm: {}", s))
    }
}

impl FromStr for HeavyAlgo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let wanted = lower.strip_prefix("cn/").unwrap_or(&lower);
        HeavyAlgo::ALL
            .into_iter()
            .find(|algo| &algo.name()[3..] == wanted)
            .ok_or_else(|| format!("Unknown memory-hard algorithm: {}", s))
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(algo) = s.parse::<CoreAlgo>() {
            return Ok(StageId::Core(algo));
        }
        s.parse::<HeavyAlgo>()
            .map(StageId::Heavy)
            .map_err(|_| format!("Unknown stage: {}", s))
    }
}
