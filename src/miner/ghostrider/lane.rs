//! Per-lane working buffer

use std::fmt;

/// Length of a block header, the input of the first stage
pub const INPUT_LEN: usize = 80;

/// Length of the chained state consumed and produced by every later stage
pub const STATE_LEN: usize = 64;

/// Length of the final digest
pub const OUTPUT_LEN: usize = 32;

/// Aligned working buffer for one lane
///
/// Several hash cores assume 64-byte aligned input, so caller data is always
/// copied in rather than hashed in place. The first stage reads all 80
/// bytes; from then on the chain narrows to the leading 64.
#[derive(Clone, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct LaneState {
    bytes: [u8; INPUT_LEN],
}

impl LaneState {
    /// Copies a block header into a fresh lane
    pub fn new(header: &[u8; INPUT_LEN]) -> Self {
        Self { bytes: *header }
    }

    /// The full 80-byte buffer
    #[inline]
    pub fn header(&self) -> &[u8; INPUT_LEN] {
        &self.bytes
    }

    /// Input of the next stage, `len` is 80 for the first stage and 64 after
    #[inline]
    pub(crate) fn input(&self, len: usize) -> &[u8] {
        &self.bytes[..len]
    }

    /// The 64-byte chained state
    #[inline]
    pub fn state_mut(&mut self) -> &mut [u8; STATE_LEN] {
        self.bytes
            .first_chunk_mut::<STATE_LEN>()
            .expect("lane buffer is longer than the state")
    }

    /// Replaces the chained state with a stage digest
    #[inline]
    pub(crate) fn set_state(&mut self, digest: &[u8; STATE_LEN]) {
        self.state_mut().copy_from_slice(digest);
    }

    /// Truncated final digest
    pub fn digest(&self) -> [u8; OUTPUT_LEN] {
        let mut out = [0u8; OUTPUT_LEN];
        out.copy_from_slice(&self.bytes[..OUTPUT_LEN]);
        out
    }
}

impl Default for LaneState {
    fn default() -> Self {
        Self {
            bytes: [0u8; INPUT_LEN],
        }
    }
}

impl fmt::Debug for LaneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LaneState")
            .field(&hex::encode(self.bytes))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_are_cache_line_aligned() {
        assert_eq!(std::mem::align_of::<LaneState>(), 64);
        let lanes = [LaneState::default(), LaneState::default()];
        for lane in &lanes {
            assert_eq!(lane.header().as_ptr() as usize % 64, 0);
        }
    }

    #[test]
    fn state_updates_keep_the_header_tail() {
        let mut header = [0u8; INPUT_LEN];
        header[70] = 0x5A;
        let mut lane = LaneState::new(&header);
        lane.set_state(&[0xFF; STATE_LEN]);
        assert_eq!(lane.input(STATE_LEN), &[0xFF; STATE_LEN][..]);
        assert_eq!(lane.header()[70], 0x5A);
        assert_eq!(lane.digest(), [0xFF; OUTPUT_LEN]);
    }
}
