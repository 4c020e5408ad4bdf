// src/miner/worker.rs
//! Worker thread implementation
//!
//! A worker owns one [`GhostRider`] context and scans nonce ranges of a
//! header in lane-sized batches. Completed hash counts go to the stats
//! reporter over a channel; what to do with each digest is up to the
//! caller.

use crate::miner::algorithm::HashSuite;
use crate::miner::ghostrider::{GhostRider, INPUT_LEN, LaneCount, MAX_LANES, OUTPUT_LEN};
use crate::miner::memory::ArenaOptions;
use crate::utils::error::Result;
use crossbeam_channel::Sender;
use std::ops::Range;
use std::sync::Arc;

/// Offset of the little-endian nonce inside a header
pub const NONCE_OFFSET: usize = 76;

/// Hashing worker bound to one thread
pub struct Worker {
    /// Worker index, used in log lines
    id: usize,
    /// Hashing context, never shared
    context: GhostRider,
    /// Lanes hashed per call
    lanes: LaneCount,
    /// Channel for completed hash counts
    hash_sender: Sender<u64>,
}

impl Worker {
    /// Creates a new Worker instance
    ///
    /// # Arguments
    /// * `id` - Worker index
    /// * `suite` - Shared stage implementations
    /// * `options` - Scratch arena options
    /// * `lanes` - Lanes per hash call
    /// * `hash_sender` - Channel receiving hash counts
    pub fn new(
        id: usize,
        suite: Arc<HashSuite>,
        options: ArenaOptions,
        lanes: LaneCount,
        hash_sender: Sender<u64>,
    ) -> Self {
        Worker {
            id,
            context: GhostRider::new(suite, options),
            lanes,
            hash_sender,
        }
    }

    /// Hashes `header` once per nonce in `nonces`
    ///
    /// The nonce is written into bytes 76..80 of a copy of the header.
    /// Every digest is handed to `visit` in nonce order. A trailing batch
    /// smaller than the lane count runs with fewer lanes.
    ///
    /// # Returns
    /// Number of hashes computed
    pub fn scan<F>(
        &mut self,
        header: &[u8; INPUT_LEN],
        nonces: Range<u32>,
        mut visit: F,
    ) -> Result<u64>
    where
        F: FnMut(u32, &[u8; OUTPUT_LEN]),
    {
        let lanes = self.lanes.get();
        let mut blobs = [*header; MAX_LANES];
        let mut digests = [[0u8; OUTPUT_LEN]; MAX_LANES];
        let mut total = 0u64;
        let mut next = nonces.start;

        while next < nonces.end {
            let batch = ((nonces.end - next) as usize).min(lanes);
            for (i, blob) in blobs[..batch].iter_mut().enumerate() {
                let nonce = next + i as u32;
                blob[NONCE_OFFSET..].copy_from_slice(&nonce.to_le_bytes());
            }

            let inputs: [&[u8]; MAX_LANES] = std::array::from_fn(|i| &blobs[i][..]);
            self.context.hash_lanes(&inputs[..batch], &mut digests[..batch])?;
            for (i, digest) in digests[..batch].iter().enumerate() {
                visit(next + i as u32, digest);
            }

            let _ = self.hash_sender.send(batch as u64);
            total += batch as u64;
            next += batch as u32;
        }

        log::debug!("Worker {} hashed {} nonces", self.id, total);
        Ok(total)
    }

    /// Order memo and arena of this worker's context
    pub fn context(&self) -> &GhostRider {
        &self.context
    }
}
