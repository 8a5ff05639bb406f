//! Memory management module.
//!
//! This module provides the memory the manager places modules into:
//! - Region handles and permission flags
//! - The provider trait the manager allocates through
//! - A talc arena provider and an mmap provider

pub mod arena;
#[cfg(all(unix, feature = "mmap"))]
pub mod mmap;
pub mod provider;
pub mod region;

pub use arena::ArenaProvider;
#[cfg(all(unix, feature = "mmap"))]
pub use mmap::MmapProvider;
pub use provider::RegionProvider;
pub use region::{Region, RegionFlags};
