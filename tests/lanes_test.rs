//! Multi-lane execution must agree with single-lane execution

mod common;

use common::{context, pattern_header, stand_in_suite, test_options, with_nonce};
use ghostrider::miner::ghostrider::{INPUT_LEN, derive_order, header_seed, resolve_rotation};
use ghostrider::{GhostRider, GhostRiderError};
use std::collections::HashSet;

/// Headers of one work item, differing only in their nonce
fn batch<const N: usize>(header: &[u8; INPUT_LEN], first_nonce: u32) -> [[u8; INPUT_LEN]; N] {
    std::array::from_fn(|i| with_nonce(header, first_nonce + i as u32))
}

fn assert_lanes_match<const N: usize>(ctx: &mut GhostRider, header: &[u8; INPUT_LEN]) {
    let inputs = batch::<N>(header, 1000);
    let batched = ctx.hash_n(&inputs).unwrap();
    for (lane, input) in inputs.iter().enumerate() {
        assert_eq!(
            ctx.hash_one(input).unwrap(),
            batched[lane],
            "lane {} of {} diverged",
            lane,
            N
        );
    }
}

#[test]
fn lanes_match_single_hashing_across_rotations() {
    let (suite, fused) = stand_in_suite();
    let mut ctx = GhostRider::new(suite, test_options());
    let mut rotations = HashSet::new();

    for step in 1..=12u8 {
        let header = pattern_header(step, step.wrapping_mul(17));
        rotations.insert(resolve_rotation(&derive_order(&header_seed(&header))));
        assert_lanes_match::<2>(&mut ctx, &header);
        assert_lanes_match::<3>(&mut ctx, &header);
        assert_lanes_match::<4>(&mut ctx, &header);
    }

    assert!(rotations.len() > 3, "only {} rotations covered", rotations.len());
    assert!(fused.get() > 0, "no fused call was made");
}

#[test]
fn distinct_nonces_give_distinct_digests() {
    let mut ctx = context();
    let inputs = batch::<4>(&pattern_header(3, 1), 0);
    let digests = ctx.hash_n(&inputs).unwrap();
    let unique: HashSet<_> = digests.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn contexts_are_independent() {
    let header = pattern_header(5, 9);
    let mut a = context();
    let mut b = context();
    let from_a = a.hash_one(&header).unwrap();
    assert_eq!(b.hash_n(&[header; 2]).unwrap(), [from_a; 2]);
    assert_eq!(a.hash_one(&header).unwrap(), from_a);
}

#[test]
fn contract_violations_are_rejected_before_hashing() {
    let mut ctx = context();

    let err = ctx.hash_one(&[0u8; 79]).unwrap_err();
    assert!(matches!(err, GhostRiderError::InputLength { lane: 0, len: 79 }));

    let none: [[u8; INPUT_LEN]; 0] = [];
    assert!(matches!(ctx.hash_n(&none), Err(GhostRiderError::LaneCount(0))));

    let header = pattern_header(1, 0);
    let mut outputs = [[0u8; 32]; 3];
    let err = ctx.hash_lanes(&[&header, &header], &mut outputs).unwrap_err();
    assert!(matches!(err, GhostRiderError::OutputMismatch { .. }));

    assert_eq!(ctx.arena().allocations(), 0);
    assert_eq!(ctx.cache_stats().misses, 0);
}
