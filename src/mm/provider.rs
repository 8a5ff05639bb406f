//! The memory primitive the manager allocates through.

use super::{Region, RegionFlags};

/// Reserves and releases memory blocks with a requested permission set.
///
/// Implementations are used from a single thread; methods take `&self` so one
/// provider can back several managers at once (see
/// [`PicoManager::duplicate`](crate::PicoManager::duplicate)).
pub trait RegionProvider {
    /// Reserves and commits `size` bytes with `flags`, or `None` if refused.
    fn reserve_commit(&self, size: usize, flags: RegionFlags) -> Option<Region>;

    /// Returns a region obtained from this provider.
    fn release(&self, region: Region);
}

impl<P: RegionProvider + ?Sized> RegionProvider for &P {
    fn reserve_commit(&self, size: usize, flags: RegionFlags) -> Option<Region> {
        (**self).reserve_commit(size, flags)
    }

    fn release(&self, region: Region) {
        (**self).release(region)
    }
}
