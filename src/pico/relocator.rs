//! Collaborator traits: the module format and the import table.

use memory_addr::VirtAddr;

use super::Vault;

/// Identifies an export inside a module.
pub type ExportTag = i32;

/// Entry point signature of a placed module.
pub type PicoMain = unsafe extern "C" fn(arg: *mut u8);

/// Resolves the imports of a module while it is placed.
///
/// This trait allows for flexible strategies, supporting both closures and
/// structs with state.
pub trait ImportResolver {
    /// Finds `symbol` in `library`.
    fn resolve(&self, library: &str, symbol: &str) -> Option<*const ()>;
}

impl<F> ImportResolver for F
where
    F: Fn(&str, &str) -> Option<*const ()>,
{
    fn resolve(&self, library: &str, symbol: &str) -> Option<*const ()> {
        self(library, symbol)
    }
}

impl ImportResolver for () {
    fn resolve(&self, _library: &str, _symbol: &str) -> Option<*const ()> {
        None
    }
}

/// The module format: measures, places and inspects relocatable modules.
///
/// The manager never parses a source buffer itself; everything it knows about
/// a module comes through this trait.
pub trait Relocator {
    /// Bytes of code the module needs in the executable region.
    fn code_size(&self, vault: Vault<'_>) -> usize;

    /// Bytes of mutable data the module needs in its writable region.
    fn data_size(&self, vault: Vault<'_>) -> usize;

    /// Copies and relocates the module. `code` is exactly `code_size` bytes
    /// inside the executable region, `data` exactly `data_size` bytes.
    fn place(
        &self,
        imports: &dyn ImportResolver,
        vault: Vault<'_>,
        code: &mut [u8],
        data: &mut [u8],
    );

    /// Entry point of a module placed at `code`.
    fn entry_point(&self, vault: Vault<'_>, code: VirtAddr) -> VirtAddr;

    /// Address of the export tagged `tag` of a module placed at `code`.
    fn resolve_export(&self, vault: Vault<'_>, code: VirtAddr, tag: ExportTag) -> Option<VirtAddr>;
}

impl<R: Relocator + ?Sized> Relocator for &R {
    fn code_size(&self, vault: Vault<'_>) -> usize {
        (**self).code_size(vault)
    }

    fn data_size(&self, vault: Vault<'_>) -> usize {
        (**self).data_size(vault)
    }

    fn place(
        &self,
        imports: &dyn ImportResolver,
        vault: Vault<'_>,
        code: &mut [u8],
        data: &mut [u8],
    ) {
        (**self).place(imports, vault, code, data)
    }

    fn entry_point(&self, vault: Vault<'_>, code: VirtAddr) -> VirtAddr {
        (**self).entry_point(vault, code)
    }

    fn resolve_export(&self, vault: Vault<'_>, code: VirtAddr, tag: ExportTag) -> Option<VirtAddr> {
        (**self).resolve_export(vault, code, tag)
    }
}
