//! Per-module metadata records.

use memory_addr::VirtAddr;

use super::relocator::PicoMain;
use super::{PicoName, Vault};
use crate::mm::Region;

/// Position of an entry in the catalog.
///
/// Not a stable handle: removing an entry shifts every later entry one
/// position left and renumbers it.
pub type PicoId = usize;

/// Where a module's code sits inside the executable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Byte offset from the start of the executable region.
    pub offset: usize,
    /// Code length in bytes.
    pub len: usize,
    /// Absolute address of the first code byte.
    pub addr: VirtAddr,
}

impl Placement {
    /// First byte past the code.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether the two code ranges share at least one byte.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// One registered module.
#[derive(Debug)]
pub struct PicoEntry<'v> {
    pub(crate) id: PicoId,
    pub(crate) name: PicoName,
    pub(crate) vault: Vault<'v>,
    pub(crate) code_size: usize,
    pub(crate) data_size: usize,
    pub(crate) placement: Option<Placement>,
    pub(crate) data: Option<Region>,
    pub(crate) entry_point: Option<VirtAddr>,
}

impl<'v> PicoEntry<'v> {
    pub(crate) fn new(
        id: PicoId,
        name: PicoName,
        vault: Vault<'v>,
        code_size: usize,
        data_size: usize,
    ) -> Self {
        Self {
            id,
            name,
            vault,
            code_size,
            data_size,
            placement: None,
            data: None,
            entry_point: None,
        }
    }

    pub fn id(&self) -> PicoId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vault(&self) -> Vault<'v> {
        self.vault
    }

    pub fn code_size(&self) -> usize {
        self.code_size
    }

    pub fn data_size(&self) -> usize {
        self.data_size
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn code(&self) -> Option<VirtAddr> {
        self.placement.map(|p| p.addr)
    }

    /// The module's writable region, if it has been loaded and has data.
    pub fn data(&self) -> Option<&Region> {
        self.data.as_ref()
    }

    pub fn entry_point(&self) -> Option<VirtAddr> {
        self.entry_point
    }

    pub fn is_loaded(&self) -> bool {
        self.placement.is_some()
    }

    /// The entry point as a callable function.
    ///
    /// # Safety
    ///
    /// The executable region must be mapped executable and the placed code
    /// must follow the [`PicoMain`] calling convention.
    pub unsafe fn entry_fn(&self) -> Option<PicoMain> {
        self.entry_point
            .map(|addr| unsafe { core::mem::transmute::<*const u8, PicoMain>(addr.as_ptr()) })
    }
}
