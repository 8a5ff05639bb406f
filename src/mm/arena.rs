//! Arena-backed region provider.
//!
//! A fixed block of memory is carved into regions by talc. Permissions are
//! only recorded on the handle: the arena itself is ordinary heap memory, so
//! this provider suits hosts that never jump into placed code (tests, dry runs,
//! offline relocation) and callers that want a hard memory budget.

use core::alloc::Layout;
use core::cell::RefCell;
use core::ptr::NonNull;
use std::rc::Rc;

use talc::{ErrOnOom, Span, Talc};

use super::{Region, RegionFlags, RegionProvider};
use crate::config::limits::{CODE_REGION_ALIGN, DATA_REGION_ALIGN, DEFAULT_ARENA_SIZE};

struct ArenaInner {
    talc: Talc<ErrOnOom>,
    // Backing storage; talc hands out pointers into it.
    memory: Box<[u8]>,
    live: usize,
    live_bytes: usize,
}

/// A talc-managed arena shared by every clone of the provider.
#[derive(Clone)]
pub struct ArenaProvider {
    inner: Rc<RefCell<ArenaInner>>,
}

fn layout_for(size: usize, flags: RegionFlags) -> Option<Layout> {
    let align = if flags.contains(RegionFlags::EXECUTE) {
        CODE_REGION_ALIGN
    } else {
        DATA_REGION_ALIGN
    };
    Layout::from_size_align(size, align).ok()
}

impl ArenaInner {
    /// Whether `region` lies entirely inside the backing storage.
    fn owns(&self, region: &Region) -> bool {
        let start = self.memory.as_ptr() as usize;
        let end = start + self.memory.len();
        let base = region.base().as_usize();
        base >= start && base.checked_add(region.size()).is_some_and(|e| e <= end)
    }
}

impl ArenaProvider {
    /// Creates an arena of `size` bytes.
    pub fn new(size: usize) -> Self {
        let mut memory = vec![0u8; size].into_boxed_slice();
        let mut talc = Talc::new(ErrOnOom);
        // A claim fails only for arenas too small to hold talc's metadata;
        // such an arena then refuses every request.
        let claimed = unsafe {
            talc.claim(Span::from_base_size(memory.as_mut_ptr(), memory.len()))
        };
        if claimed.is_err() {
            warn!("arena of {size:#x} bytes is too small to be managed");
        }
        Self {
            inner: Rc::new(RefCell::new(ArenaInner {
                talc,
                memory,
                live: 0,
                live_bytes: 0,
            })),
        }
    }

    /// Number of regions handed out and not yet released.
    pub fn live_regions(&self) -> usize {
        self.inner.borrow().live
    }

    /// Bytes held by live regions.
    pub fn live_bytes(&self) -> usize {
        self.inner.borrow().live_bytes
    }
}

impl Default for ArenaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_SIZE)
    }
}

impl RegionProvider for ArenaProvider {
    fn reserve_commit(&self, size: usize, flags: RegionFlags) -> Option<Region> {
        if size == 0 {
            return None;
        }
        let layout = layout_for(size, flags)?;
        let mut inner = self.inner.borrow_mut();
        let ptr = unsafe { inner.talc.malloc(layout) }.ok()?;
        unsafe { ptr.as_ptr().write_bytes(0, size) };
        inner.live += 1;
        inner.live_bytes += size;
        trace!("arena: reserved {size:#x} bytes at {:p} ({flags:?})", ptr);
        Some(unsafe { Region::from_raw_parts(ptr.as_ptr(), size, flags) })
    }

    fn release(&self, region: Region) {
        let mut inner = self.inner.borrow_mut();
        if !inner.owns(&region) {
            error!("arena: {region:?} was not reserved here, leaking it");
            return;
        }
        let Some(layout) = layout_for(region.size(), region.flags()) else {
            return;
        };
        let Some(ptr) = NonNull::new(region.base().as_mut_ptr()) else {
            return;
        };
        unsafe { inner.talc.free(ptr, layout) };
        inner.live = inner.live.saturating_sub(1);
        inner.live_bytes = inner.live_bytes.saturating_sub(region.size());
        trace!("arena: released {region:?}");
    }
}
