//! Lookup table from stage identifier to hash implementation

use crate::miner::algorithm::{CoreHash, DigestStage, HeavyHash};
use crate::types::{CORE_COUNT, CoreAlgo, HEAVY_COUNT, HeavyAlgo, StageId};
use crate::utils::error::{GhostRiderError, Result};
use std::fmt;

/// Complete set of the 21 stage implementations
///
/// Built once and shared (usually behind an `Arc`) by every worker. Lookups
/// index straight into fixed tables.
pub struct HashSuite {
    core: Vec<Box<dyn CoreHash>>,
    heavy: Vec<Box<dyn HeavyHash>>,
}

impl HashSuite {
    /// Starts an empty builder
    pub fn builder() -> SuiteBuilder {
        SuiteBuilder::default()
    }

    /// Implementation of a lightweight stage
    #[inline]
    pub fn core(&self, algo: CoreAlgo) -> &dyn CoreHash {
        self.core[algo.index()].as_ref()
    }

    /// Implementation of a memory-hard stage
    #[inline]
    pub fn heavy(&self, algo: HeavyAlgo) -> &dyn HeavyHash {
        self.heavy[algo.index()].as_ref()
    }

    /// Largest per-lane scratch requirement across the memory-hard stages
    pub fn max_heavy_scratch(&self) -> usize {
        self.heavy
            .iter()
            .map(|h| h.scratch_bytes())
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Debug for HashSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSuite")
            .field("core", &self.core.len())
            .field("heavy", &self.heavy.len())
            .finish()
    }
}

/// Collects stage implementations and checks that none is missing
pub struct SuiteBuilder {
    core: Vec<Option<Box<dyn CoreHash>>>,
    heavy: Vec<Option<Box<dyn HeavyHash>>>,
}

impl Default for SuiteBuilder {
    fn default() -> Self {
        Self {
            core: (0..CORE_COUNT).map(|_| None).collect(),
            heavy: (0..HEAVY_COUNT).map(|_| None).collect(),
        }
    }
}

impl SuiteBuilder {
    /// Registers (or replaces) a lightweight stage
    pub fn core(mut self, algo: CoreAlgo, hash: impl CoreHash + 'static) -> Self {
        self.core[algo.index()] = Some(Box::new(hash));
        self
    }

    /// Registers (or replaces) a memory-hard stage
    pub fn heavy(mut self, algo: HeavyAlgo, hash: impl HeavyHash + 'static) -> Self {
        self.heavy[algo.index()] = Some(Box::new(hash));
        self
    }

    /// Registers every lightweight stage a published crate implements
    ///
    /// Keccak-512 is always available; Groestl, JH, Skein, Shabal and
    /// Whirlpool need the `rustcrypto` feature.
    pub fn with_published_stages(self) -> Self {
        let builder = self.core(CoreAlgo::Keccak, DigestStage::<sha3::Keccak512>::new());
        #[cfg(feature = "rustcrypto")]
        let builder = super::rustcrypto::register(builder);
        builder
    }

    /// Stages that still lack an implementation
    pub fn missing(&self) -> Vec<StageId> {
        let core = CoreAlgo::ALL
            .into_iter()
            .filter(|algo| self.core[algo.index()].is_none())
            .map(StageId::Core);
        let heavy = HeavyAlgo::ALL
            .into_iter()
            .filter(|algo| self.heavy[algo.index()].is_none())
            .map(StageId::Heavy);
        core.chain(heavy).collect()
    }

    /// Finishes the suite
    ///
    /// # Errors
    /// `MissingPrimitive` naming the first stage without an implementation.
    pub fn build(self) -> Result<HashSuite> {
        if let Some(stage) = self.missing().into_iter().next() {
            return Err(GhostRiderError::MissingPrimitive(stage));
        }

        Ok(HashSuite {
            core: self.core.into_iter().flatten().collect(),
            heavy: self.heavy.into_iter().flatten().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::ghostrider::lane::STATE_LEN;

    struct Fixed(u8);

    impl CoreHash for Fixed {
        fn digest(&self, _input: &[u8]) -> [u8; STATE_LEN] {
            [self.0; STATE_LEN]
        }
    }

    struct Noop(usize);

    impl HeavyHash for Noop {
        fn scratch_bytes(&self) -> usize {
            self.0
        }

        fn hash(&self, _scratch: &mut [u8], _state: &mut [u8; STATE_LEN], _heavy: bool) {}
    }

    fn full_builder() -> SuiteBuilder {
        let builder = CoreAlgo::ALL
            .into_iter()
            .fold(HashSuite::builder(), |b, algo| b.core(algo, Fixed(algo as u8)));
        HeavyAlgo::ALL
            .into_iter()
            .fold(builder, |b, algo| b.heavy(algo, Noop(algo.scratch_bytes())))
    }

    #[test]
    fn build_reports_first_missing_stage() {
        let err = HashSuite::builder()
            .core(CoreAlgo::Blake, Fixed(0))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            GhostRiderError::MissingPrimitive(StageId::Core(CoreAlgo::Bmw))
        ));
    }

    #[test]
    fn missing_lists_heavy_stages_after_core() {
        let builder = CoreAlgo::ALL
            .into_iter()
            .fold(HashSuite::builder(), |b, algo| b.core(algo, Fixed(0)));
        assert_eq!(
            builder.missing(),
            HeavyAlgo::ALL.map(StageId::Heavy).to_vec()
        );
    }

    #[test]
    fn lookups_dispatch_by_identifier() {
        let suite = full_builder().build().unwrap();
        assert_eq!(suite.core(CoreAlgo::Hamsi).digest(&[]), [11u8; STATE_LEN]);
        assert_eq!(
            suite.heavy(HeavyAlgo::Lite).scratch_bytes(),
            HeavyAlgo::Lite.scratch_bytes()
        );
        assert_eq!(suite.max_heavy_scratch(), HeavyAlgo::Fast.scratch_bytes());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let suite = full_builder()
            .core(CoreAlgo::Blake, Fixed(0xAA))
            .build()
            .unwrap();
        assert_eq!(suite.core(CoreAlgo::Blake).digest(&[]), [0xAA; STATE_LEN]);
    }

    #[test]
    fn published_stages_fill_keccak() {
        let builder = HashSuite::builder().with_published_stages();
        assert!(!builder.missing().contains(&StageId::Core(CoreAlgo::Keccak)));
    }
}
