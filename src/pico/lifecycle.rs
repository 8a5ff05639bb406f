//! Manager duplication (migration to a fresh region) and teardown.

use super::manager::PicoManager;
use super::relocator::Relocator;
use crate::config::ManagerConfig;
use crate::mm::RegionProvider;
use crate::PicoResult;

impl<'v, R: Relocator + Clone, P: RegionProvider + Clone> PicoManager<'v, R, P> {
    /// Builds a new manager holding every module of this one, unplaced, with
    /// a freshly sized executable region.
    ///
    /// The region gets the final padding chosen by
    /// `config.migration_headroom`. Nothing is loaded: call
    /// [`load`](Self::load) on the result.
    pub fn duplicate(&self, new_capacity: usize) -> PicoResult<Self> {
        let final_padding = self
            .config
            .migration_headroom
            .final_padding(self.catalog.len(), self.config.inter_module_padding);
        self.duplicate_with(new_capacity, final_padding)
    }

    /// Like [`duplicate`](Self::duplicate) with an explicit final padding.
    pub fn duplicate_with(&self, new_capacity: usize, final_padding: usize) -> PicoResult<Self> {
        let config = ManagerConfig {
            capacity: new_capacity,
            ..self.config.clone()
        };
        let mut new = PicoManager::new(self.relocator.clone(), self.provider.clone(), config);
        for entry in self.catalog.iter() {
            new.register_vault(&entry.name, entry.vault)?;
        }
        new.allocate_exec_region(final_padding)?;
        info!(
            "duplicated manager: {} PICO(s), capacity {new_capacity}, region {:#x} bytes",
            new.len(),
            new.exec_region().map_or(0, |exec| exec.size())
        );
        Ok(new)
    }
}

impl<'v, R: Relocator, P: RegionProvider> PicoManager<'v, R, P> {
    /// Releases the executable region and empties the catalog.
    ///
    /// Writable regions of entries still registered are not released; remove
    /// entries first to get them back. Returns how many were left behind.
    /// Source buffers are never touched. The manager stays usable as an empty
    /// one.
    pub fn destroy(&mut self) -> usize {
        if let Some(exec) = self.exec.take() {
            debug!("releasing executable region {:?}", exec.region);
            self.provider.release(exec.region);
        }
        let leaked = self
            .catalog
            .drain()
            .into_iter()
            .filter(|entry| entry.data.is_some())
            .count();
        if leaked > 0 {
            warn!("manager torn down with {leaked} writable region(s) still attached");
        }
        leaked
    }
}

impl<'v, R: Relocator, P: RegionProvider> Drop for PicoManager<'v, R, P> {
    fn drop(&mut self) {
        self.destroy();
    }
}
