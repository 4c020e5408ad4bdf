//! Scratch memory backing the memory-hard stages
//!
//! One arena per worker. It grows in whole 2 MiB pages, never shrinks on
//! its own and survives across hash calls; only [`ScratchArena::release`]
//! or dropping it gives the memory back.

use crate::miner::memory::hugepages::{
    HUGE_PAGE_SIZE, HugePageSource, NoHugePages, default_source,
};
use crate::utils::error::{GhostRiderError, Result};
use std::fmt;
use std::ptr::NonNull;
use std::time::{Duration, Instant};

/// Arena behavior knobs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArenaOptions {
    /// Try huge pages before the standard allocator
    pub huge_pages: bool,
    /// Minimum pause between returning huge pages and allocating again
    pub release_delay: Duration,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            huge_pages: true,
            release_delay: Duration::from_millis(25),
        }
    }
}

enum Region {
    HugePages { ptr: NonNull<u8>, len: usize },
    Heap(Box<[u8]>),
}

impl Region {
    fn len(&self) -> usize {
        match self {
            Region::HugePages { len, .. } => *len,
            Region::Heap(buf) => buf.len(),
        }
    }
}

/// Growable, page-rounded scratch buffer owned by one worker
pub struct ScratchArena {
    region: Option<Region>,
    source: Box<dyn HugePageSource>,
    options: ArenaOptions,
    allocations: u64,
    /// When huge pages were last handed back, until the next allocation
    released_at: Option<Instant>,
}

// SAFETY: the arena exclusively owns its region; moving it to another
// thread moves that ownership. It is not Sync, so it is never shared.
unsafe impl Send for ScratchArena {}

impl ScratchArena {
    /// Creates an empty arena using the platform huge-page source
    pub fn new(options: ArenaOptions) -> Self {
        let source: Box<dyn HugePageSource> = if options.huge_pages {
            default_source()
        } else {
            Box::new(NoHugePages)
        };
        Self::with_source(options, source)
    }

    /// Creates an empty arena with an explicit huge-page source
    pub fn with_source(options: ArenaOptions, source: Box<dyn HugePageSource>) -> Self {
        Self {
            region: None,
            source,
            options,
            allocations: 0,
            released_at: None,
        }
    }

    /// Bytes currently held
    pub fn capacity(&self) -> usize {
        self.region.as_ref().map_or(0, Region::len)
    }

    /// Whether the current region is huge-page backed
    pub fn is_huge_page_backed(&self) -> bool {
        matches!(self.region, Some(Region::HugePages { .. }))
    }

    /// Number of regions allocated over the arena's lifetime
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Grows the arena to hold at least `bytes`
    ///
    /// A no-op when the current region is already large enough. Otherwise
    /// the old region is released and a new one of `bytes` rounded up to
    /// whole huge pages is allocated, huge pages first. If huge pages were
    /// returned less than `release_delay` ago, by this call or an earlier
    /// [`release`](Self::release), the remainder of the delay is waited out
    /// first.
    ///
    /// # Errors
    /// `ScratchAllocation` when the standard allocator also fails.
    pub fn ensure_capacity(&mut self, bytes: usize) -> Result<()> {
        let size = bytes.div_ceil(HUGE_PAGE_SIZE) * HUGE_PAGE_SIZE;
        if self.capacity() >= size {
            return Ok(());
        }

        self.release_region();
        let region = self.allocate(size)?;
        log::info!(
            "Allocated {} KiB of scratch ({})",
            size / 1024,
            match region {
                Region::HugePages { .. } => "huge pages",
                Region::Heap(_) => "standard pages",
            }
        );
        self.region = Some(region);
        self.allocations += 1;
        Ok(())
    }

    fn allocate(&mut self, size: usize) -> Result<Region> {
        if let Some(released_at) = self.released_at.take() {
            let remaining = self.options.release_delay.saturating_sub(released_at.elapsed());
            if !remaining.is_zero() {
                log::debug!("Waiting {:?} for released huge pages to settle", remaining);
                std::thread::sleep(remaining);
            }
        }

        if self.options.huge_pages {
            if let Some(ptr) = self.source.map(size) {
                return Ok(Region::HugePages { ptr, len: size });
            }
            log::warn!(
                "Huge pages unavailable for {} KiB of scratch, falling back",
                size / 1024
            );
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(size)
            .map_err(|_| GhostRiderError::ScratchAllocation { size })?;
        buf.resize(size, 0u8);
        Ok(Region::Heap(buf.into_boxed_slice()))
    }

    fn release_region(&mut self) {
        if let Some(Region::HugePages { ptr, len }) = self.region.take() {
            // SAFETY: the region came from `source.map` with this length.
            unsafe { self.source.unmap(ptr, len) };
            self.released_at = Some(Instant::now());
        }
    }

    /// Returns the memory to the system
    pub fn release(&mut self) {
        self.release_region();
    }

    /// The scratch region, empty before the first `ensure_capacity`
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.region {
            // SAFETY: the mapping is live, exclusively owned and `len` long.
            Some(Region::HugePages { ptr, len }) => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr(), *len)
            },
            Some(Region::Heap(buf)) => &mut buf[..],
            None => &mut [],
        }
    }
}

impl Default for ScratchArena {
    fn default() -> Self {
        Self::new(ArenaOptions::default())
    }
}

impl Drop for ScratchArena {
    fn drop(&mut self) {
        self.release_region();
    }
}

impl fmt::Debug for ScratchArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchArena")
            .field("capacity", &self.capacity())
            .field("huge_pages", &self.is_huge_page_backed())
            .field("allocations", &self.allocations)
            .finish()
    }
}
