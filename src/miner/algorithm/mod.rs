// src/miner/algorithm/mod.rs
//! Hash primitives the GhostRider chain is assembled from
//!
//! The chain itself never implements a hash transform. It consumes two
//! capabilities:
//! - [`CoreHash`]: a lightweight function producing a 512-bit digest
//! - [`HeavyHash`]: a memory-hard function updating a 64-byte lane state in
//!   place, using caller-provided scratch memory
//!
//! A [`HashSuite`] binds one implementation to every [`StageId`](crate::types::StageId)
//! and is shared read-only between workers.

/// Adapter exposing any 512-bit `digest::Digest` as a [`CoreHash`]
pub mod digest_stage;

/// Stage lookup table and its builder
pub mod suite;

/// Registration of the lightweight stages RustCrypto publishes
#[cfg(feature = "rustcrypto")]
pub mod rustcrypto;

use crate::miner::ghostrider::lane::{LaneState, STATE_LEN};

pub use self::digest_stage::DigestStage;
pub use self::suite::{HashSuite, SuiteBuilder};

/// Common interface for the 15 lightweight stages
///
/// Implementations are stateless across calls: any internal context is
/// initialized per call. The first stage of a chain receives 80 bytes,
/// every later stage 64 bytes.
pub trait CoreHash: Send + Sync {
    /// Hash `input` into a 64-byte digest
    fn digest(&self, input: &[u8]) -> [u8; STATE_LEN];
}

/// Common interface for the 6 memory-hard stages
///
/// The 64-byte lane buffer is the working hash state and is updated in
/// place. `heavy` selects the double-iteration variant for the active
/// rotation and changes the produced digest.
pub trait HeavyHash: Send + Sync {
    /// Scratch bytes a single lane needs
    fn scratch_bytes(&self) -> usize;

    /// Hash one lane
    ///
    /// `scratch` is at least [`HeavyHash::scratch_bytes`] long; the executor
    /// rejects undersized arenas before dispatching.
    fn hash(&self, scratch: &mut [u8], state: &mut [u8; STATE_LEN], heavy: bool);

    /// Hash 2, 3 or 4 lanes in one call
    ///
    /// `scratch` holds `lanes.len() * scratch_bytes()` bytes. Results must be
    /// bit-identical to calling [`HeavyHash::hash`] once per lane; the default
    /// does exactly that.
    ///
    /// # Panics
    /// When `scratch` is shorter than `lanes.len() * scratch_bytes()`.
    fn hash_fused(&self, scratch: &mut [u8], lanes: &mut [LaneState], heavy: bool) {
        let per_lane = self.scratch_bytes();
        assert!(
            scratch.len() >= per_lane * lanes.len(),
            "fused scratch holds {} bytes, {} lanes need {}",
            scratch.len(),
            lanes.len(),
            per_lane * lanes.len()
        );
        for lane in lanes.iter_mut() {
            self.hash(&mut scratch[..per_lane], lane.state_mut(), heavy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Per-lane kernel relying on the default fused path
    #[derive(Default)]
    struct Sequential {
        seen: Mutex<Vec<usize>>,
    }

    impl HeavyHash for Sequential {
        fn scratch_bytes(&self) -> usize {
            128
        }

        fn hash(&self, scratch: &mut [u8], state: &mut [u8; STATE_LEN], _heavy: bool) {
            self.seen.lock().unwrap().push(scratch.len());
            state[0] ^= 0xFF;
        }
    }

    #[test]
    fn default_fusion_hands_each_lane_exactly_its_share() {
        let kernel = Sequential::default();
        let mut lanes = vec![LaneState::default(); 3];
        let mut scratch = vec![0u8; 3 * 128 + 17];
        kernel.hash_fused(&mut scratch, &mut lanes, false);
        assert_eq!(*kernel.seen.lock().unwrap(), vec![128; 3]);
        assert!(lanes.iter_mut().all(|l| l.state_mut()[0] == 0xFF));
    }

    #[test]
    #[should_panic(expected = "fused scratch holds")]
    fn default_fusion_refuses_undersized_scratch() {
        let kernel = Sequential::default();
        let mut lanes = vec![LaneState::default(); 2];
        let mut scratch = vec![0u8; 128 + 64];
        kernel.hash_fused(&mut scratch, &mut lanes, false);
    }
}
