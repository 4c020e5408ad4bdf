//! Deterministic stand-in stages shared by the integration tests
//!
//! Lightweight stages are SHA3-512 with a one-byte algorithm tag in front
//! of the input. Memory-hard stages fill a 64 KiB region from a SHA3-512
//! chain, then walk it pseudo-randomly; the heavy flag doubles the walk.

#![allow(dead_code)]

use ghostrider::miner::ghostrider::{INPUT_LEN, LaneState, STATE_LEN};
use ghostrider::{ArenaOptions, CoreAlgo, CoreHash, GhostRider, HashSuite, HeavyAlgo, HeavyHash};
use sha3::{Digest, Sha3_512};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scratch one stand-in memory-hard lane touches
pub const WALK_SCRATCH: usize = 64 * 1024;

/// Walk length without the heavy flag
pub const WALK_ROUNDS: usize = 256;

fn sha3_512(parts: &[&[u8]]) -> [u8; STATE_LEN] {
    let mut hasher = Sha3_512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; STATE_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// SHA3-512 over `tag || input`
pub struct TaggedSha3(pub u8);

impl CoreHash for TaggedSha3 {
    fn digest(&self, input: &[u8]) -> [u8; STATE_LEN] {
        sha3_512(&[&[self.0], input])
    }
}

/// Memory-hard stand-in, counting the lanes it hashed in fused calls
pub struct ScratchWalk {
    tag: u8,
    fused_lanes: Arc<AtomicUsize>,
}

fn walk(tag: u8, scratch: &mut [u8], state: &mut [u8; STATE_LEN], heavy: bool) {
    let region = &mut scratch[..WALK_SCRATCH];
    let mut block = sha3_512(&[&[tag], &state[..]]);
    for line in region.chunks_exact_mut(STATE_LEN) {
        line.copy_from_slice(&block);
        block = sha3_512(&[&block]);
    }

    let rounds = if heavy { 2 * WALK_ROUNDS } else { WALK_ROUNDS };
    let mut acc = *state;
    for round in 0..rounds {
        let word = u32::from_le_bytes([acc[0], acc[1], acc[2], acc[3]]) as usize;
        let index = word % (WALK_SCRATCH / STATE_LEN);
        let line = &mut region[index * STATE_LEN..(index + 1) * STATE_LEN];
        for i in 0..STATE_LEN {
            acc[i] ^= line[i];
            line[i] = line[i].wrapping_add(acc[(i + round) % STATE_LEN]);
        }
        acc.rotate_left(1);
    }
    *state = sha3_512(&[&acc, &region[..STATE_LEN]]);
}

impl HeavyHash for ScratchWalk {
    fn scratch_bytes(&self) -> usize {
        WALK_SCRATCH
    }

    fn hash(&self, scratch: &mut [u8], state: &mut [u8; STATE_LEN], heavy: bool) {
        walk(self.tag, scratch, state, heavy);
    }

    fn hash_fused(&self, scratch: &mut [u8], lanes: &mut [LaneState], heavy: bool) {
        assert!(scratch.len() >= lanes.len() * WALK_SCRATCH);
        self.fused_lanes.fetch_add(lanes.len(), Ordering::SeqCst);
        // Each lane in its own region, last lane first
        for (i, lane) in lanes.iter_mut().enumerate().rev() {
            let region = &mut scratch[i * WALK_SCRATCH..(i + 1) * WALK_SCRATCH];
            walk(self.tag, region, lane.state_mut(), heavy);
        }
    }
}

/// Lanes hashed through fused calls across every memory-hard stage
#[derive(Clone, Default)]
pub struct FusionCounter(Arc<AtomicUsize>);

impl FusionCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Complete stand-in suite; tags are the stage identifiers 0..=20
pub fn stand_in_suite() -> (Arc<HashSuite>, FusionCounter) {
    let counter = FusionCounter::default();
    let builder = CoreAlgo::ALL
        .into_iter()
        .fold(HashSuite::builder(), |b, algo| b.core(algo, TaggedSha3(algo.index() as u8)));
    let suite = HeavyAlgo::ALL
        .into_iter()
        .fold(builder, |b, algo| {
            b.heavy(
                algo,
                ScratchWalk {
                    tag: 15 + algo.index() as u8,
                    fused_lanes: counter.0.clone(),
                },
            )
        })
        .build()
        .expect("every stage is registered");
    (Arc::new(suite), counter)
}

/// Arena options that never touch huge pages or sleep
pub fn test_options() -> ArenaOptions {
    ArenaOptions {
        huge_pages: false,
        release_delay: Duration::ZERO,
    }
}

/// Fresh context over the stand-in suite
pub fn context() -> GhostRider {
    GhostRider::new(stand_in_suite().0, test_options())
}

/// Header whose byte `i` is `(i * step + offset) mod 256`
pub fn pattern_header(step: u8, offset: u8) -> [u8; INPUT_LEN] {
    std::array::from_fn(|i| (i as u8).wrapping_mul(step).wrapping_add(offset))
}

/// Copy of `header` with a little-endian nonce in bytes 76..80
pub fn with_nonce(header: &[u8; INPUT_LEN], nonce: u32) -> [u8; INPUT_LEN] {
    let mut out = *header;
    out[76..].copy_from_slice(&nonce.to_le_bytes());
    out
}
