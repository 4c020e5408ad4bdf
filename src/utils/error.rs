use crate::types::StageId;
use std::io;
use thiserror::Error;

/// Main error type for the GhostRider hashing core
///
/// Caller-contract violations are rejected before any stage runs, so an
/// error never leaves a lane half-hashed. The only resource failure is the
/// scratch allocation, which is reported once the standard-allocation
/// fallback has also failed.
#[derive(Error, Debug)]
pub enum GhostRiderError {
    /// Lane count outside 1..=4
    #[error("Unsupported lane count: {0} (expected 1 to 4)")]
    LaneCount(usize),

    /// A lane's input is not exactly one 80-byte block header
    #[error("Lane {lane} input is {len} bytes, expected 80")]
    InputLength {
        /// Lane index
        lane: usize,
        /// Length the caller supplied
        len: usize,
    },

    /// Number of output slots differs from the number of inputs
    #[error("Got {inputs} inputs but {outputs} output slots")]
    OutputMismatch {
        /// Number of input lanes
        inputs: usize,
        /// Number of output slots
        outputs: usize,
    },

    /// Neither huge pages nor the standard allocator could provide scratch
    #[error("Failed to allocate {size} bytes of scratch memory")]
    ScratchAllocation {
        /// Requested size in bytes
        size: usize,
    },

    /// A memory-hard stage needs more scratch than the arena holds
    #[error("{stage} needs {required} bytes of scratch, arena holds {available}")]
    ScratchUndersized {
        /// Stage being dispatched
        stage: StageId,
        /// Bytes the fused call needs
        required: usize,
        /// Bytes currently held by the arena
        available: usize,
    },

    /// A hash suite was built without an implementation for a stage
    #[error("No implementation registered for stage {0}")]
    MissingPrimitive(StageId),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Converts hex decoding errors into GhostRiderError
///
/// Used when parsing header or block-hash arguments on the command line.
/// Wraps the original error in an `InputError` variant.
impl From<hex::FromHexError> for GhostRiderError {
    fn from(e: hex::FromHexError) -> Self {
        GhostRiderError::InputError(format!("Hex conversion failed: {}", e))
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, GhostRiderError>;
