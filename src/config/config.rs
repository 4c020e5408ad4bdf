// src/config/config.rs
use crate::miner::ghostrider::{LaneCount, max_scratch_bytes};
use crate::miner::memory::{ArenaOptions, HUGE_PAGE_SIZE, SysfsHugePages};
use crate::utils::error::GhostRiderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the hashing workers
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Try huge pages for scratch memory before the standard allocator
    #[serde(default = "default_huge_pages")]
    pub huge_pages: bool,

    /// Milliseconds to wait after returning huge pages before mapping
    /// new ones (default: 25)
    #[serde(default = "default_release_delay_ms")]
    pub release_delay_ms: u64,

    /// Lanes hashed per call, 1 to 4 (default: 4)
    #[serde(default = "default_lanes")]
    pub lanes: usize,

    /// Number of worker threads
    /// (default: number of CPU cores)
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// NUMA node whose huge-page pool is provisioned
    #[serde(default)]
    pub numa_node: usize,

    /// Grow the huge-page pool at startup (needs root)
    #[serde(default)]
    pub provision_huge_pages: bool,
}

fn default_huge_pages() -> bool {
    true
}

fn default_release_delay_ms() -> u64 {
    25
}

fn default_lanes() -> usize {
    4
}

fn default_worker_threads() -> usize {
    num_cpus::get()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            huge_pages: default_huge_pages(),
            release_delay_ms: default_release_delay_ms(),
            lanes: default_lanes(),
            worker_threads: default_worker_threads(),
            numa_node: 0,
            provision_huge_pages: false,
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(GhostRiderError)` - If file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, GhostRiderError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            GhostRiderError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_str)
            .map_err(|e| GhostRiderError::ConfigError(format!("Invalid config format: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges
    pub fn validate(&self) -> Result<(), GhostRiderError> {
        self.lane_count().map_err(|_| {
            GhostRiderError::ConfigError(format!("lanes must be 1 to 4, got {}", self.lanes))
        })?;
        if self.worker_threads == 0 {
            return Err(GhostRiderError::ConfigError(
                "worker_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Lanes per hash call as a checked count
    pub fn lane_count(&self) -> Result<LaneCount, GhostRiderError> {
        LaneCount::try_from(self.lanes)
    }

    /// Scratch arena options derived from this configuration
    pub fn arena_options(&self) -> ArenaOptions {
        ArenaOptions {
            huge_pages: self.huge_pages,
            release_delay: Duration::from_millis(self.release_delay_ms),
        }
    }

    /// Huge pages one worker's arena grows to in the worst case
    pub fn pages_per_thread(&self) -> usize {
        max_scratch_bytes().div_ceil(HUGE_PAGE_SIZE)
    }

    /// Grows `pool` on `numa_node` for `worker_threads` arenas
    ///
    /// Only acts when both `provision_huge_pages` and `huge_pages` are set;
    /// otherwise the pool is left alone and `false` is returned.
    ///
    /// # Returns
    /// `true` when enough free huge pages exist afterwards
    pub fn reserve_huge_pages(&self, pool: &SysfsHugePages) -> bool {
        if !(self.provision_huge_pages && self.huge_pages) {
            return false;
        }
        pool.provision_for_threads(self.worker_threads, self.pages_per_thread(), self.numa_node)
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# GhostRider Configuration\n\n");
        template.push_str("# Lanes hashed per call (1-4)\n");
        template.push_str("lanes = 4\n");
        template.push_str("# Number of worker threads\n");
        template.push_str(&format!("worker_threads = {}\n\n", num_cpus::get()));
        template.push_str("# Scratch memory\n");
        template.push_str("huge_pages = true\n");
        template.push_str("# Delay after unmapping huge pages, in milliseconds\n");
        template.push_str("release_delay_ms = 25\n\n");
        template.push_str("# Huge-page pool provisioning (needs root)\n");
        template.push_str("provision_huge_pages = false\n");
        template.push_str("numa_node = 0\n");
        template
    }
}
