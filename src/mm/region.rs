//! Owned memory region handles.

use core::fmt;

use memory_addr::{VirtAddr, va};

bitflags::bitflags! {
    /// The access permissions of a memory region.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct RegionFlags: usize {
        /// Readable.
        const READ          = 1 << 0;
        /// Writable.
        const WRITE         = 1 << 1;
        /// Executable.
        const EXECUTE       = 1 << 2;

        /// Per-module writable data.
        const RW  = Self::READ.bits() | Self::WRITE.bits();
        /// Shared code region, written at placement time and executed afterwards.
        const RWX = Self::RW.bits() | Self::EXECUTE.bits();
    }
}

impl fmt::Debug for RegionFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// An exclusively owned block of memory obtained from a
/// [`RegionProvider`](super::RegionProvider).
///
/// The handle has no `Drop`: memory goes back only through
/// [`RegionProvider::release`](super::RegionProvider::release). Dropping a
/// handle leaks the block.
#[must_use]
pub struct Region {
    base: VirtAddr,
    size: usize,
    flags: RegionFlags,
}

impl Region {
    /// Wraps a block handed out by a provider.
    ///
    /// # Safety
    ///
    /// `base..base + size` must be valid for reads and writes, must not be
    /// aliased by any other live `Region`, and must stay mapped until the
    /// handle is released.
    pub unsafe fn from_raw_parts(base: *mut u8, size: usize, flags: RegionFlags) -> Self {
        Self {
            base: va!(base as usize),
            size,
            flags,
        }
    }

    pub fn base(&self) -> VirtAddr {
        self.base
    }

    /// Requested size in bytes; providers may have rounded the real block up.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn flags(&self) -> RegionFlags {
        self.flags
    }

    pub fn contains(&self, addr: VirtAddr) -> bool {
        let start = self.base.as_usize();
        (start..start + self.size).contains(&addr.as_usize())
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.base.as_ptr(), self.size) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.base.as_mut_ptr(), self.size) }
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("base", &format_args!("{:#x}", self.base.as_usize()))
            .field("size", &format_args!("{:#x}", self.size))
            .field("flags", &self.flags)
            .finish()
    }
}
