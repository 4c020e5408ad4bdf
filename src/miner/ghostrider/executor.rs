//! Multi-lane hash chain executor
//!
//! [`GhostRider`] is the per-worker hashing context. It owns everything a
//! hash call mutates (order memo, scratch arena, lane buffers) and shares
//! only the read-only [`HashSuite`]. Give each worker thread its own
//! context; nothing in here is synchronized.

use crate::miner::algorithm::HashSuite;
use crate::miner::ghostrider::batch::{BatchPlan, dispatch};
use crate::miner::ghostrider::cache::{CacheStats, OrderCache};
use crate::miner::ghostrider::lane::{INPUT_LEN, LaneState, OUTPUT_LEN, STATE_LEN};
use crate::miner::ghostrider::order::AlgoOrder;
use crate::miner::ghostrider::tuning::{LaneCount, TuningRow, max_scratch_bytes, tuning_row};
use crate::miner::memory::{ArenaOptions, ScratchArena};
use crate::types::StageId;
use crate::utils::error::{GhostRiderError, Result};
use std::sync::Arc;

/// Most lanes one call can carry
pub const MAX_LANES: usize = 4;

/// Per-worker GhostRider hashing context
#[derive(Debug)]
pub struct GhostRider {
    suite: Arc<HashSuite>,
    cache: OrderCache,
    arena: ScratchArena,
    lanes: [LaneState; MAX_LANES],
}

impl GhostRider {
    /// Creates a context with a fresh arena
    ///
    /// # Arguments
    /// * `suite` - Stage implementations, shared between workers
    /// * `options` - Huge-page preference and release delay of the arena
    pub fn new(suite: Arc<HashSuite>, options: ArenaOptions) -> Self {
        Self::with_arena(suite, ScratchArena::new(options))
    }

    /// Creates a context around an existing arena
    pub fn with_arena(suite: Arc<HashSuite>, arena: ScratchArena) -> Self {
        Self {
            suite,
            cache: OrderCache::new(),
            arena,
            lanes: Default::default(),
        }
    }

    /// Hashes one 80-byte header
    ///
    /// # Errors
    /// `InputLength` when `input` is not exactly 80 bytes, or an arena
    /// allocation failure.
    pub fn hash_one(&mut self, input: &[u8]) -> Result<[u8; OUTPUT_LEN]> {
        let mut output = [[0u8; OUTPUT_LEN]; 1];
        self.hash_lanes(&[input], &mut output)?;
        Ok(output[0])
    }

    /// Hashes `N` headers of the same work item in one pass
    ///
    /// Lane `i` of the result equals `hash_one(&inputs[i])`.
    ///
    /// # Errors
    /// `LaneCount` unless `N` is 1 to 4, or an arena allocation failure.
    pub fn hash_n<const N: usize>(
        &mut self,
        inputs: &[[u8; INPUT_LEN]; N],
    ) -> Result<[[u8; OUTPUT_LEN]; N]> {
        let refs: [&[u8]; N] = std::array::from_fn(|i| &inputs[i][..]);
        let mut outputs = [[0u8; OUTPUT_LEN]; N];
        self.hash_lanes(&refs, &mut outputs)?;
        Ok(outputs)
    }

    /// Hashes 1 to 4 lanes into matching output slots
    ///
    /// All lanes take the order of lane 0; callers only batch headers of
    /// one block. Every precondition is checked before the first stage.
    ///
    /// # Errors
    /// * `LaneCount` - zero or more than four inputs
    /// * `OutputMismatch` - `outputs` and `inputs` differ in length
    /// * `InputLength` - an input is not exactly 80 bytes
    /// * `ScratchAllocation` / `ScratchUndersized` - no usable scratch
    pub fn hash_lanes(&mut self, inputs: &[&[u8]], outputs: &mut [[u8; OUTPUT_LEN]]) -> Result<()> {
        let count = LaneCount::try_from(inputs.len())?;
        if outputs.len() != inputs.len() {
            return Err(GhostRiderError::OutputMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        for (lane, input) in inputs.iter().enumerate() {
            let header: &[u8; INPUT_LEN] = (*input)
                .try_into()
                .map_err(|_| GhostRiderError::InputLength { lane, len: input.len() })?;
            self.lanes[lane] = LaneState::new(header);
        }

        let (order, rotation) = self.cache.resolve(self.lanes[0].header());
        let row = tuning_row(count, rotation);
        let required = self.required_scratch(&order, &row, count);
        self.arena.ensure_capacity(required)?;

        let scratch = self.arena.as_mut_slice();
        let lanes = &mut self.lanes[..count.get()];
        let mut len = INPUT_LEN;
        for stage in order.iter() {
            match stage {
                StageId::Core(algo) => {
                    let core = self.suite.core(algo);
                    for lane in lanes.iter_mut() {
                        let digest = core.digest(lane.input(len));
                        lane.set_state(&digest);
                    }
                }
                StageId::Heavy(algo) => {
                    let plan = BatchPlan::new(&row, algo, count);
                    dispatch(algo, self.suite.heavy(algo), &plan, scratch, lanes)?;
                }
            }
            len = STATE_LEN;
        }

        for (out, lane) in outputs.iter_mut().zip(lanes.iter()) {
            *out = lane.digest();
        }
        Ok(())
    }

    /// Scratch for this call: the table-wide worst case, or more if the
    /// suite's kernels ask for it under this row
    fn required_scratch(&self, order: &AlgoOrder, row: &TuningRow, count: LaneCount) -> usize {
        order
            .heavy_triplet()
            .into_iter()
            .map(|algo| {
                let per_lane = self.suite.heavy(algo).scratch_bytes();
                BatchPlan::new(row, algo, count).scratch_bytes(per_lane)
            })
            .fold(max_scratch_bytes(), usize::max)
    }

    /// Order memo counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The worker's scratch arena
    pub fn arena(&self) -> &ScratchArena {
        &self.arena
    }

    /// Stage implementations in use
    pub fn suite(&self) -> &Arc<HashSuite> {
        &self.suite
    }

    /// Returns the scratch memory and forgets the memoized order
    pub fn release(&mut self) {
        self.arena.release();
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::algorithm::{CoreHash, HeavyHash};
    use crate::types::{CoreAlgo, HeavyAlgo};
    use std::time::Duration;

    /// Adds the algorithm tag to every byte of the first 64 input bytes
    struct AddTag(u8);

    impl CoreHash for AddTag {
        fn digest(&self, input: &[u8]) -> [u8; STATE_LEN] {
            let mut out = [0u8; STATE_LEN];
            for (o, i) in out.iter_mut().zip(input) {
                *o = i.wrapping_add(self.0);
            }
            out
        }
    }

    /// Rotates the state, one extra byte when the flag is set
    struct Rotate(usize);

    impl HeavyHash for Rotate {
        fn scratch_bytes(&self) -> usize {
            self.0
        }

        fn hash(&self, scratch: &mut [u8], state: &mut [u8; STATE_LEN], heavy: bool) {
            assert!(scratch.len() >= self.0);
            state.rotate_left(1 + heavy as usize);
        }
    }

    fn context() -> GhostRider {
        let builder = CoreAlgo::ALL
            .into_iter()
            .fold(HashSuite::builder(), |b, algo| b.core(algo, AddTag(algo as u8 + 1)));
        let suite = HeavyAlgo::ALL
            .into_iter()
            .fold(builder, |b, algo| b.heavy(algo, Rotate(algo.scratch_bytes())))
            .build()
            .unwrap();
        let options = ArenaOptions {
            huge_pages: false,
            release_delay: Duration::ZERO,
        };
        GhostRider::new(Arc::new(suite), options)
    }

    #[test]
    fn lane_count_is_checked_first() {
        let mut ctx = context();
        let err = ctx.hash_lanes(&[], &mut []).unwrap_err();
        assert!(matches!(err, GhostRiderError::LaneCount(0)));

        let inputs = [[0u8; INPUT_LEN]; 5];
        let err = ctx.hash_n(&inputs).unwrap_err();
        assert!(matches!(err, GhostRiderError::LaneCount(5)));
        assert_eq!(ctx.cache_stats(), CacheStats::default());
    }

    #[test]
    fn short_input_names_its_lane() {
        let mut ctx = context();
        let good = [0u8; INPUT_LEN];
        let short = [0u8; 76];
        let mut out = [[0u8; OUTPUT_LEN]; 2];
        let err = ctx.hash_lanes(&[&good, &short], &mut out).unwrap_err();
        assert!(matches!(err, GhostRiderError::InputLength { lane: 1, len: 76 }));
        assert_eq!(ctx.arena().capacity(), 0);
    }

    #[test]
    fn output_slots_must_match_inputs() {
        let mut ctx = context();
        let input = [0u8; INPUT_LEN];
        let mut out = [[0u8; OUTPUT_LEN]; 2];
        let err = ctx.hash_lanes(&[&input], &mut out).unwrap_err();
        assert!(matches!(
            err,
            GhostRiderError::OutputMismatch {
                inputs: 1,
                outputs: 2
            }
        ));
    }

    #[test]
    fn arena_is_sized_to_the_table_maximum() {
        let mut ctx = context();
        ctx.hash_one(&[7u8; INPUT_LEN]).unwrap();
        assert_eq!(ctx.arena().capacity(), max_scratch_bytes());
        ctx.hash_n(&[[7u8; INPUT_LEN]; 4]).unwrap();
        assert_eq!(ctx.arena().allocations(), 1);
    }

    #[test]
    fn lanes_agree_with_single_lane_hashing() {
        let mut ctx = context();
        let mut inputs = [[0x42u8; INPUT_LEN]; 3];
        for (i, input) in inputs.iter_mut().enumerate() {
            input[76] = i as u8;
            input[40] = 3 * i as u8;
        }
        let batched = ctx.hash_n(&inputs).unwrap();
        for (input, digest) in inputs.iter().zip(batched) {
            assert_eq!(ctx.hash_one(input).unwrap(), digest);
        }
    }

    #[test]
    fn release_drops_memory_and_memo() {
        let mut ctx = context();
        let input = [1u8; INPUT_LEN];
        let first = ctx.hash_one(&input).unwrap();
        ctx.release();
        assert_eq!(ctx.arena().capacity(), 0);
        assert_eq!(ctx.hash_one(&input).unwrap(), first);
        assert_eq!(ctx.cache_stats().misses, 2);
    }
}
