use crate::miner::algorithm::CoreHash;
use crate::miner::ghostrider::lane::STATE_LEN;
use sha3::digest::{Digest, OutputSizeUser, consts::U64};
use std::fmt;
use std::marker::PhantomData;

/// Lightweight stage backed by a RustCrypto hasher
///
/// Any `Digest` with a 64-byte output fits, e.g. `sha3::Keccak512`.
pub struct DigestStage<D> {
    _hasher: PhantomData<fn() -> D>,
}

impl<D> DigestStage<D> {
    /// Creates the adapter
    pub fn new() -> Self {
        Self {
            _hasher: PhantomData,
        }
    }
}

impl<D> Default for DigestStage<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for DigestStage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestStage")
            .field("hasher", &std::any::type_name::<D>())
            .finish()
    }
}

impl<D> CoreHash for DigestStage<D>
where
    D: Digest + OutputSizeUser<OutputSize = U64>,
{
    fn digest(&self, input: &[u8]) -> [u8; STATE_LEN] {
        let mut out = [0u8; STATE_LEN];
        out.copy_from_slice(&D::digest(input));
        out
    }
}
