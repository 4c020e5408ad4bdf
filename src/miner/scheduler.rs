// src/miner/scheduler.rs
//! Worker pool built from a [`Config`]
//!
//! Splits a nonce range of one header across the configured number of
//! workers, each scanning its share on its own thread with its own
//! hashing context.

use crate::config::Config;
use crate::miner::algorithm::HashSuite;
use crate::miner::ghostrider::{INPUT_LEN, OUTPUT_LEN};
use crate::miner::memory::SysfsHugePages;
use crate::miner::worker::Worker;
use crate::stats::StatsReporter;
use crate::utils::error::Result;
use std::ops::Range;
use std::sync::Arc;

/// Coordinates hashing across worker threads
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Creates one worker per configured thread
    ///
    /// Huge pages are reserved on the configured NUMA node first when the
    /// configuration asks for it; a failed reservation only means the
    /// arenas fall back to standard pages.
    ///
    /// # Arguments
    /// * `config` - Thread count, lanes, arena options and provisioning
    /// * `suite` - Stage implementations shared by every worker
    /// * `reporter` - Receives each worker's hash counts
    pub fn new(config: &Config, suite: Arc<HashSuite>, reporter: &StatsReporter) -> Result<Self> {
        config.validate()?;
        if config.provision_huge_pages && !config.reserve_huge_pages(&SysfsHugePages::new()) {
            log::warn!("Huge page reservation failed; scratch may use standard pages");
        }

        let lanes = config.lane_count()?;
        let workers = (0..config.worker_threads)
            .map(|id| {
                Worker::new(
                    id,
                    suite.clone(),
                    config.arena_options(),
                    lanes,
                    reporter.hash_sender(),
                )
            })
            .collect();
        log::info!("Started {} {} workers", config.worker_threads, lanes);
        Ok(WorkerPool { workers })
    }

    /// Number of workers
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool has no workers
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Workers in index order
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Hashes `header` once per nonce in `nonces`, spread over all workers
    ///
    /// Each worker takes one contiguous share of the range. `visit` is
    /// called from the worker threads, in nonce order within a share.
    ///
    /// # Returns
    /// Number of hashes computed, or the first worker error
    pub fn scan<F>(
        &mut self,
        header: &[u8; INPUT_LEN],
        nonces: Range<u32>,
        visit: F,
    ) -> Result<u64>
    where
        F: Fn(u32, &[u8; OUTPUT_LEN]) + Sync,
    {
        let shares = split(nonces, self.workers.len());
        let visit = &visit;

        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .workers
                .iter_mut()
                .zip(shares)
                .filter(|(_, share)| !share.is_empty())
                .map(|(worker, share)| {
                    scope.spawn(move || worker.scan(header, share, |n, d| visit(n, d)))
                })
                .collect();

            let mut total = 0u64;
            for handle in handles {
                let hashed = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
                total += hashed;
            }
            Ok(total)
        })
    }
}

/// Contiguous shares of `nonces`, one per worker, larger shares first
fn split(nonces: Range<u32>, workers: usize) -> Vec<Range<u32>> {
    let workers = workers.max(1) as u32;
    let len = nonces.end.saturating_sub(nonces.start);
    let (base, extra) = (len / workers, len % workers);

    let mut start = nonces.start;
    (0..workers)
        .map(|i| {
            let end = start + base + u32::from(i < extra);
            let share = start..end;
            start = end;
            share
        })
        .collect()
}
