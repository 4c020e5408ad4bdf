// src/utils/mod.rs
//! Utilities module for common functionality
//!
//! Error handling and logging infrastructure shared by the library and the
//! `ghostrider` binary.

/// Error types and handling utilities
///
/// Contains the [`GhostRiderError`] enum which defines every failure the
/// hashing core can report, along with conversion implementations.
pub mod error;

/// Logging configuration and utilities
pub mod logging;

// Re-export for easier access
pub use error::{GhostRiderError, Result};
pub use logging::{init_logging, init_verbose_logging};
