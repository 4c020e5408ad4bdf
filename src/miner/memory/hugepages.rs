//! Huge-page capability
//!
//! Mapping huge pages and provisioning them are both best effort. The arena
//! only ever asks "map this many bytes, or say no"; everything platform
//! specific stays behind [`HugePageSource`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// Size of one huge page
pub const HUGE_PAGE_SIZE: usize = 2 * 1024 * 1024;

/// Provider of huge-page-backed memory
pub trait HugePageSource: Send {
    /// Maps `size` bytes (a multiple of [`HUGE_PAGE_SIZE`]) of zeroed
    /// memory, or `None` if the system refuses
    fn map(&self, size: usize) -> Option<NonNull<u8>>;

    /// Returns a region obtained from [`HugePageSource::map`]
    ///
    /// # Safety
    /// `ptr` and `size` must come from a successful `map` call on this
    /// source, and the region must not be used afterwards.
    unsafe fn unmap(&self, ptr: NonNull<u8>, size: usize);
}

/// Source that always refuses, forcing the standard allocator
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHugePages;

impl HugePageSource for NoHugePages {
    fn map(&self, _size: usize) -> Option<NonNull<u8>> {
        None
    }

    unsafe fn unmap(&self, _ptr: NonNull<u8>, _size: usize) {}
}

/// Anonymous `MAP_HUGETLB` mappings of 2 MiB pages, prefaulted
#[cfg(target_os = "linux")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MmapHugePages;

#[cfg(target_os = "linux")]
impl HugePageSource for MmapHugePages {
    fn map(&self, size: usize) -> Option<NonNull<u8>> {
        // 21 == log2(2 MiB), shifted into the MAP_HUGE_* size field
        const MAP_HUGE_2MB: libc::c_int = 21 << 26;

        // SAFETY: anonymous mapping with no address hint; the kernel either
        // returns a fresh region of `size` bytes or MAP_FAILED.
        let mem = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE
                    | libc::MAP_ANONYMOUS
                    | libc::MAP_HUGETLB
                    | libc::MAP_POPULATE
                    | MAP_HUGE_2MB,
                -1,
                0,
            )
        };
        if mem == libc::MAP_FAILED {
            return None;
        }
        NonNull::new(mem.cast::<u8>())
    }

    unsafe fn unmap(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: guaranteed by the caller contract of `unmap`.
        let rc = unsafe { libc::munmap(ptr.as_ptr().cast(), size) };
        if rc != 0 {
            log::warn!(
                "munmap of {} byte scratch region failed: {}",
                size,
                io::Error::last_os_error()
            );
        }
    }
}

/// Platform default huge-page source
pub fn default_source() -> Box<dyn HugePageSource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(MmapHugePages)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(NoHugePages)
    }
}

/// Huge-page pool control through `/sys/devices/system/node`
///
/// Provisioning raises `nr_hugepages` of one NUMA node by the number of
/// pages missing from its free pool. It needs root; failure only means the
/// arena falls back to ordinary memory.
#[derive(Debug, Clone)]
pub struct SysfsHugePages {
    root: PathBuf,
}

impl Default for SysfsHugePages {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsHugePages {
    /// Pool control rooted at the real sysfs tree
    pub fn new() -> Self {
        Self::with_root("/sys/devices/system/node")
    }

    /// Pool control rooted elsewhere (used by tests)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pool_dir(&self, node: usize) -> PathBuf {
        self.root
            .join(format!("node{}", node))
            .join("hugepages")
            .join("hugepages-2048kB")
    }

    fn read_count(path: &Path) -> io::Result<u64> {
        fs::read_to_string(path)?
            .trim()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Free 2 MiB pages on a node
    pub fn free_pages(&self, node: usize) -> io::Result<u64> {
        Self::read_count(&self.pool_dir(node).join("free_hugepages"))
    }

    /// Total 2 MiB pages reserved on a node
    pub fn total_pages(&self, node: usize) -> io::Result<u64> {
        Self::read_count(&self.pool_dir(node).join("nr_hugepages"))
    }

    /// Makes sure `pages` free huge pages exist on `node`
    ///
    /// Returns `true` when enough pages are free, either already or after
    /// growing the pool and reading the new size back.
    pub fn provision(&self, pages: u64, node: usize) -> bool {
        let available = match self.free_pages(node) {
            Ok(free) => free,
            Err(e) => {
                log::warn!("Huge pages unavailable on node {}: {}", node, e);
                return false;
            }
        };
        if available >= pages {
            log::debug!("{} free huge pages on node {}, {} needed", available, node, pages);
            return true;
        }

        let nr_path = self.pool_dir(node).join("nr_hugepages");
        let target = match Self::read_count(&nr_path) {
            Ok(total) => total + pages - available,
            Err(e) => {
                log::warn!("Could not read the huge page pool on node {}: {}", node, e);
                return false;
            }
        };
        if let Err(e) = fs::write(&nr_path, target.to_string()) {
            log::warn!("Could not reserve {} huge pages on node {}: {}", target, node, e);
            return false;
        }

        match Self::read_count(&nr_path) {
            Ok(total) if total >= target => {
                log::info!("Reserved {} huge pages on node {}", total, node);
                true
            }
            Ok(total) => {
                log::warn!("Kernel granted {} of {} huge pages on node {}", total, target, node);
                false
            }
            Err(e) => {
                log::warn!("Could not confirm huge page reservation: {}", e);
                false
            }
        }
    }

    /// Provisions `pages_per_thread` pages for each of `threads` workers
    pub fn provision_for_threads(
        &self,
        threads: usize,
        pages_per_thread: usize,
        node: usize,
    ) -> bool {
        self.provision((threads * pages_per_thread) as u64, node)
    }
}
