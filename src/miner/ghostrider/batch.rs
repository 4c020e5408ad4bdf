//! Memory-hard stage dispatch
//!
//! The tuning row decides how many lanes share one kernel call. Lanes are
//! grouped front to back: width 3 over four lanes is one triple-fused call
//! followed by one independent call, width 2 is two pairs. Fusion only
//! changes memory-system behavior, never the per-lane result.

use crate::miner::algorithm::HeavyHash;
use crate::miner::ghostrider::lane::LaneState;
use crate::miner::ghostrider::tuning::{LaneCount, TuningRow};
use crate::types::{HeavyAlgo, StageId};
use crate::utils::error::{GhostRiderError, Result};
use std::ops::Range;

/// Lane grouping for one memory-hard stage
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    width: usize,
    lanes: usize,
    heavy: bool,
}

impl BatchPlan {
    /// Plan for `algo` under a tuning row
    pub fn new(row: &TuningRow, algo: HeavyAlgo, lanes: LaneCount) -> Self {
        Self {
            width: row.batch_width(algo).min(lanes.get()),
            lanes: lanes.get(),
            heavy: row.heavy(),
        }
    }

    /// Lanes per fused call
    pub fn width(&self) -> usize {
        self.width
    }

    /// Heavy-iteration flag passed to every call
    pub fn heavy(&self) -> bool {
        self.heavy
    }

    /// Lane ranges, one per kernel call
    pub fn groups(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.lanes)
            .step_by(self.width)
            .map(|start| start..(start + self.width).min(self.lanes))
    }

    /// Scratch the widest call of this plan needs
    pub fn scratch_bytes(&self, per_lane: usize) -> usize {
        self.width * per_lane
    }
}

/// Runs one memory-hard stage over every lane
///
/// # Errors
/// `ScratchUndersized` when the widest call would not fit in `scratch`;
/// nothing is hashed in that case.
pub fn dispatch(
    algo: HeavyAlgo,
    hash: &dyn HeavyHash,
    plan: &BatchPlan,
    scratch: &mut [u8],
    lanes: &mut [LaneState],
) -> Result<()> {
    let per_lane = hash.scratch_bytes();
    let required = plan.scratch_bytes(per_lane);
    if scratch.len() < required {
        return Err(GhostRiderError::ScratchUndersized {
            stage: StageId::Heavy(algo),
            required,
            available: scratch.len(),
        });
    }

    for range in plan.groups() {
        let group = &mut lanes[range];
        if group.len() == 1 {
            hash.hash(&mut scratch[..per_lane], group[0].state_mut(), plan.heavy);
        } else {
            let bytes = per_lane * group.len();
            hash.hash_fused(&mut scratch[..bytes], group, plan.heavy);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::ghostrider::lane::STATE_LEN;
    use crate::miner::ghostrider::rotation::RotationId;
    use crate::miner::ghostrider::tuning::tuning_row;
    use std::sync::Mutex;

    /// Records the lane count of every call and xors the flag into the state
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<usize>>,
    }

    impl HeavyHash for Recorder {
        fn scratch_bytes(&self) -> usize {
            64
        }

        fn hash(&self, scratch: &mut [u8], state: &mut [u8; STATE_LEN], heavy: bool) {
            assert!(scratch.len() >= 64);
            self.calls.lock().unwrap().push(1);
            state[0] = state[0].wrapping_add(1 + heavy as u8);
        }

        fn hash_fused(&self, scratch: &mut [u8], lanes: &mut [LaneState], heavy: bool) {
            assert!(scratch.len() >= 64 * lanes.len());
            self.calls.lock().unwrap().push(lanes.len());
            for lane in lanes {
                let state = lane.state_mut();
                state[0] = state[0].wrapping_add(1 + heavy as u8);
            }
        }
    }

    fn plan(width: usize, lanes: usize) -> BatchPlan {
        BatchPlan {
            width,
            lanes,
            heavy: false,
        }
    }

    fn group_sizes(plan: &BatchPlan) -> Vec<usize> {
        plan.groups().map(|r| r.len()).collect()
    }

    #[test]
    fn groupings_cover_every_lane_once() {
        assert_eq!(group_sizes(&plan(1, 4)), vec![1, 1, 1, 1]);
        assert_eq!(group_sizes(&plan(2, 4)), vec![2, 2]);
        assert_eq!(group_sizes(&plan(3, 4)), vec![3, 1]);
        assert_eq!(group_sizes(&plan(4, 4)), vec![4]);
        assert_eq!(group_sizes(&plan(2, 3)), vec![2, 1]);
        assert_eq!(group_sizes(&plan(1, 1)), vec![1]);
    }

    #[test]
    fn plan_takes_width_and_flag_from_the_row() {
        let row = tuning_row(LaneCount::Four, RotationId::new(4).unwrap());
        let plan = BatchPlan::new(&row, HeavyAlgo::Turtle, LaneCount::Four);
        assert_eq!(plan.width(), 4);
        assert!(plan.heavy());

        let plan = BatchPlan::new(&row, HeavyAlgo::Fast, LaneCount::Four);
        assert_eq!(plan.width(), 1);
    }

    #[test]
    fn dispatch_fuses_according_to_the_plan() {
        let recorder = Recorder::default();
        let mut lanes = vec![LaneState::default(); 4];
        let mut scratch = vec![0u8; 4 * 64];
        dispatch(HeavyAlgo::Dark, &recorder, &plan(3, 4), &mut scratch, &mut lanes).unwrap();
        assert_eq!(*recorder.calls.lock().unwrap(), vec![3, 1]);
        assert!(lanes.iter_mut().all(|l| l.state_mut()[0] == 1));
    }

    #[test]
    fn heavy_flag_reaches_the_kernel() {
        let recorder = Recorder::default();
        let mut lanes = vec![LaneState::default(); 2];
        let mut scratch = vec![0u8; 128];
        let flagged = BatchPlan {
            width: 2,
            lanes: 2,
            heavy: true,
        };
        dispatch(HeavyAlgo::Dark, &recorder, &flagged, &mut scratch, &mut lanes).unwrap();
        assert!(lanes.iter_mut().all(|l| l.state_mut()[0] == 2));
    }

    #[test]
    fn undersized_scratch_is_rejected_before_hashing() {
        let recorder = Recorder::default();
        let mut lanes = vec![LaneState::default(); 4];
        let mut scratch = vec![0u8; 3 * 64];
        let err = dispatch(HeavyAlgo::Lite, &recorder, &plan(4, 4), &mut scratch, &mut lanes)
            .unwrap_err();
        assert!(matches!(
            err,
            GhostRiderError::ScratchUndersized {
                required: 256,
                available: 192,
                ..
            }
        ));
        assert!(recorder.calls.lock().unwrap().is_empty());
    }
}
