// src/miner/memory/mod.rs
//! Scratch memory for the memory-hard stages

/// Per-worker growable scratch arena
pub mod arena;

/// Huge-page mapping and provisioning
pub mod hugepages;

pub use self::arena::{ArenaOptions, ScratchArena};
pub use self::hugepages::{HUGE_PAGE_SIZE, HugePageSource, NoHugePages, SysfsHugePages};
