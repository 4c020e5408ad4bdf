// src/stats/reporter.rs
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Statistics related to hashing throughput
#[derive(Debug, Clone, Default)]
pub struct HashStats {
    /// Total number of hashes computed
    pub hashes_total: u64,
    /// Average hashrate over 1 minute (hashes per second)
    pub avg_hashrate_1m: f64,
    /// Average hashrate over 15 minutes (hashes per second)
    pub avg_hashrate_15m: f64,
}

/// Collects hash counts from workers and reports the hashrate
#[derive(Clone)]
pub struct StatsReporter {
    /// Shared counters
    stats: Arc<HashStatsAtomic>,
}

impl Default for StatsReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Atomic counters behind [`HashStats`]
struct HashStatsAtomic {
    hashes: AtomicU64,
    start_time: Instant,
}

impl StatsReporter {
    /// Creates a reporter whose hashrate window starts now
    pub fn new() -> Self {
        StatsReporter {
            stats: Arc::new(HashStatsAtomic {
                hashes: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
        }
    }

    /// Creates and returns a channel sender for hash counts
    ///
    /// The reporter drains the channel on a background thread that ends
    /// once every sender is dropped.
    pub fn hash_sender(&self) -> Sender<u64> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.start_hashrate_listener(rx);
        tx
    }

    /// Gets the current hashing statistics
    ///
    /// # Returns
    /// A snapshot of the counters
    pub fn get_stats(&self) -> HashStats {
        let total_seconds = self.stats.start_time.elapsed().as_secs_f64();
        let hashes = self.stats.hashes.load(Ordering::Relaxed);

        HashStats {
            hashes_total: hashes,
            avg_hashrate_1m: hashes as f64 / total_seconds.clamp(1.0, 60.0),
            avg_hashrate_15m: hashes as f64 / total_seconds.clamp(1.0, 900.0),
        }
    }

    /// Starts a listener for hash counts on a background thread
    fn start_hashrate_listener(&self, receiver: Receiver<u64>) {
        let stats = self.stats.clone();

        std::thread::spawn(move || {
            for count in receiver {
                stats.hashes.fetch_add(count, Ordering::Relaxed);
            }
        });
    }
}
