//! Page-backed region provider using anonymous `mmap`.

use core::ptr;

use memory_addr::align_up_4k;

use super::{Region, RegionFlags, RegionProvider};

/// Maps every region as fresh anonymous pages with the requested protection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MmapProvider;

fn prot_for(flags: RegionFlags) -> libc::c_int {
    let mut prot = libc::PROT_NONE;
    if flags.contains(RegionFlags::READ) {
        prot |= libc::PROT_READ;
    }
    if flags.contains(RegionFlags::WRITE) {
        prot |= libc::PROT_WRITE;
    }
    if flags.contains(RegionFlags::EXECUTE) {
        prot |= libc::PROT_EXEC;
    }
    prot
}

impl RegionProvider for MmapProvider {
    fn reserve_commit(&self, size: usize, flags: RegionFlags) -> Option<Region> {
        if size == 0 || size > isize::MAX as usize {
            return None;
        }
        let len = align_up_4k(size);
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                prot_for(flags),
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            warn!(
                "mmap of {len:#x} bytes ({flags:?}) failed: {}",
                std::io::Error::last_os_error()
            );
            return None;
        }
        Some(unsafe { Region::from_raw_parts(addr.cast(), size, flags) })
    }

    fn release(&self, region: Region) {
        let len = align_up_4k(region.size());
        let ret = unsafe { libc::munmap(region.base().as_mut_ptr().cast(), len) };
        if ret != 0 {
            error!(
                "munmap of {region:?} failed: {}",
                std::io::Error::last_os_error()
            );
        }
    }
}
