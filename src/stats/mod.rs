//! Statistics collection and reporting module
//!
//! Workers push completed hash counts through a channel; the
//! [`StatsReporter`] accumulates them and derives the hashrate.

/// Submodule containing the statistics reporter implementation
pub mod reporter;

// Re-export main components
pub use reporter::{HashStats, StatsReporter};
