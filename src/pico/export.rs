//! Export lookup for placed modules.

use memory_addr::VirtAddr;

use super::entry::{PicoEntry, PicoId};
use super::manager::PicoManager;
use super::relocator::{ExportTag, Relocator};
use crate::mm::RegionProvider;

impl<'v, R: Relocator, P: RegionProvider> PicoManager<'v, R, P> {
    /// Resolves export `tag` of the module at `id`, if it is placed.
    pub fn export_by_id(&self, id: PicoId, tag: ExportTag) -> Option<VirtAddr> {
        self.export_of(self.catalog.get(id)?, tag)
    }

    /// Resolves export `tag` of the first module called `name`, if it is placed.
    pub fn export_by_name(&self, name: &str, tag: ExportTag) -> Option<VirtAddr> {
        self.export_of(self.catalog.find(name)?, tag)
    }

    fn export_of(&self, entry: &PicoEntry<'v>, tag: ExportTag) -> Option<VirtAddr> {
        let code = entry.code()?;
        let addr = self.relocator.resolve_export(entry.vault, code, tag);
        trace!("export {tag} of '{}' -> {addr:?}", entry.name);
        addr
    }
}
