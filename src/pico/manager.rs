//! PICO manager - registration, region sizing, lookup and removal.
//!
//! The manager owns one shared executable region holding the code of every
//! placed module, and one writable region per module for its data. Loading
//! lives in [`super::loader`], exports in [`super::export`], duplication and
//! teardown in [`super::lifecycle`].

use memory_addr::VirtAddr;

use super::catalog::Catalog;
use super::entry::{PicoEntry, PicoId};
use super::relocator::Relocator;
use super::Vault;
use crate::config::ManagerConfig;
use crate::mm::{Region, RegionFlags, RegionProvider};
use crate::{PicoError, PicoResult};

/// The shared executable region and its bookkeeping.
#[derive(Debug)]
pub struct ExecRegion {
    pub(super) region: Region,
    /// End of the last module's code as of the last successful load.
    pub(super) used: usize,
    /// Offset the next module goes to under the high-water strategy.
    pub(super) cursor: usize,
    /// End of the highest module's code placed so far.
    pub(super) code_end: usize,
}

impl ExecRegion {
    fn new(region: Region) -> Self {
        Self {
            region,
            used: 0,
            cursor: 0,
            code_end: 0,
        }
    }

    pub fn base(&self) -> VirtAddr {
        self.region.base()
    }

    pub fn size(&self) -> usize {
        self.region.size()
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

/// Loader and lifetime manager for position-independent code modules.
///
/// Not thread safe: every operation expects exclusive access, which `&mut self`
/// enforces.
pub struct PicoManager<'v, R: Relocator, P: RegionProvider> {
    pub(super) relocator: R,
    pub(super) provider: P,
    pub(super) config: ManagerConfig,
    pub(super) exec: Option<ExecRegion>,
    pub(super) catalog: Catalog<'v>,
}

impl<'v, R: Relocator, P: RegionProvider> PicoManager<'v, R, P> {
    /// Creates an empty manager. No memory is allocated yet.
    pub fn new(relocator: R, provider: P, config: ManagerConfig) -> Self {
        debug!(
            "new manager: capacity {}, padding {:#x}, {:?} placement",
            config.capacity, config.inter_module_padding, config.placement
        );
        Self {
            relocator,
            provider,
            catalog: Catalog::new(config.capacity),
            config,
            exec: None,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn inter_module_padding(&self) -> usize {
        self.config.inter_module_padding
    }

    pub fn relocator(&self) -> &R {
        &self.relocator
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn catalog(&self) -> &Catalog<'v> {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.catalog.capacity()
    }

    pub fn entries(&self) -> impl Iterator<Item = &PicoEntry<'v>> {
        self.catalog.iter()
    }

    /// Registers a module from its source buffer.
    ///
    /// Only measures the module; nothing is allocated or placed until
    /// [`load`](Self::load).
    pub fn register(&mut self, name: &str, source: &'v [u8]) -> PicoResult<PicoId> {
        self.register_vault(name, Vault::new(source)?)
    }

    pub fn register_vault(&mut self, name: &str, vault: Vault<'v>) -> PicoResult<PicoId> {
        if self.catalog.is_full() {
            return Err(PicoError::CapacityExceeded(self.catalog.capacity()));
        }
        let code_size = self.relocator.code_size(vault);
        let data_size = self.relocator.data_size(vault);
        let id = self.catalog.push(name, vault, code_size, data_size)?;
        info!("registered PICO {id} '{name}': code {code_size:#x}, data {data_size:#x}");
        Ok(id)
    }

    pub fn get_by_id(&self, id: PicoId) -> Option<&PicoEntry<'v>> {
        self.catalog.get(id)
    }

    /// First entry whose name matches exactly (case-sensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&PicoEntry<'v>> {
        self.catalog.find(name)
    }

    /// Removes an entry, releasing its writable region.
    ///
    /// Its code stays where it was: the executable region keeps the gap until
    /// the whole region is released. Every later entry moves one position left
    /// and takes that position as its new id.
    pub fn remove_by_id(&mut self, id: PicoId) -> PicoResult<()> {
        let mut entry = self.catalog.remove(id)?;
        if let Some(data) = entry.data.take() {
            self.provider.release(data);
        }
        match entry.placement {
            Some(placement) => info!(
                "removed PICO {id} '{}', leaving {:#x} bytes of code at offset {:#x}",
                entry.name, placement.len, placement.offset
            ),
            None => info!("removed PICO {id} '{}'", entry.name),
        }
        Ok(())
    }

    pub fn remove_by_name(&mut self, name: &str) -> PicoResult<()> {
        let id = self.catalog.position(name).ok_or(PicoError::NotFound)?;
        self.remove_by_id(id)
    }

    /// Code bytes of every entry plus the inter-module padding between them.
    pub fn total_code_size(&self) -> usize {
        self.catalog.total_code_size(self.config.inter_module_padding)
    }

    /// Size [`allocate_exec_region`](Self::allocate_exec_region) requests.
    ///
    /// Padding is counted once more per gap on top of
    /// [`total_code_size`](Self::total_code_size), and at least once for a
    /// non-empty catalog, because every placement reserves padding after its
    /// code. A single module therefore gets one padding, not zero.
    ///
    /// Saturates at `usize::MAX`, which no provider can satisfy.
    pub fn required_exec_size(&self, final_padding: usize) -> usize {
        let count = self.catalog.len();
        let gaps = if count == 0 { 0 } else { (count - 1).max(1) };
        self.total_code_size()
            .saturating_add(self.config.inter_module_padding.saturating_mul(gaps))
            .saturating_add(final_padding)
    }

    /// Allocates the executable region for the current catalog.
    pub fn allocate_exec_region(&mut self, final_padding: usize) -> PicoResult<()> {
        self.allocate_exec_region_sized(self.required_exec_size(final_padding))
    }

    /// Allocates an executable region of exactly `size` bytes.
    pub fn allocate_exec_region_sized(&mut self, size: usize) -> PicoResult<()> {
        if self.exec.is_some() {
            return Err(PicoError::AlreadyAllocated);
        }
        let region = self
            .provider
            .reserve_commit(size, RegionFlags::RWX)
            .ok_or(PicoError::AllocationFailed { size })?;
        info!(
            "executable region: {size:#x} bytes at {:#x}",
            region.base().as_usize()
        );
        self.exec = Some(ExecRegion::new(region));
        Ok(())
    }

    pub fn exec_region(&self) -> Option<&ExecRegion> {
        self.exec.as_ref()
    }

    pub fn is_allocated(&self) -> bool {
        self.exec.is_some()
    }

    /// `usedSize` of the executable region, zero while unallocated.
    pub fn used_size(&self) -> usize {
        self.exec.as_ref().map_or(0, |exec| exec.used)
    }
}
