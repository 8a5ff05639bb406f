//! Load scheduler - places registered modules into the executable region.
//!
//! Loading can happen in phases: `load(UpTo(0), ..)` places only the first
//! module (say, the hooks every other module resolves at run time), a later
//! `load(All, ..)` places the rest. Entries already placed are never touched
//! again.
//!
//! Two strategies pick the offset of the next module (see
//! [`PlacementStrategy`]):
//!
//! - `Replay` walks the catalog from offset zero, advancing past every placed
//!   entry by `code_size + padding` as if placing it again. This assumes the
//!   placed entries form a gap-free prefix in catalog order. Removing a placed
//!   module breaks that: the survivors keep their addresses while the replay
//!   compacts them, so new modules can land on top of live code.
//! - `HighWater` keeps a bump cursor in the region and only ever places past
//!   it. Gaps left by removed modules are not reused either.

use memory_addr::va;

use super::entry::{Placement, PicoId};
use super::manager::PicoManager;
use super::relocator::{ImportResolver, Relocator};
use crate::config::PlacementStrategy;
use crate::mm::{RegionFlags, RegionProvider};
use crate::{PicoError, PicoResult};

/// How far into the catalog a load pass goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBoundary {
    /// Every registered entry.
    All,
    /// Entries `0..=id`.
    UpTo(PicoId),
}

impl LoadBoundary {
    /// Number of catalog positions covered out of `count`.
    pub fn limit(self, count: usize) -> usize {
        match self {
            LoadBoundary::All => count,
            LoadBoundary::UpTo(id) => id.saturating_add(1).min(count),
        }
    }
}

impl<'v, R: Relocator, P: RegionProvider> PicoManager<'v, R, P> {
    /// Places every unplaced entry within `boundary`.
    ///
    /// Each placement must leave `final_padding` bytes free at the end of the
    /// region. On [`PicoError::InsufficientSpace`] or a refused writable
    /// region the call stops: modules placed earlier in the same call stay
    /// placed, but `used_size` keeps its previous value.
    pub fn load(
        &mut self,
        boundary: LoadBoundary,
        final_padding: usize,
        imports: &dyn ImportResolver,
    ) -> PicoResult<()> {
        let exec = self.exec.as_mut().ok_or(PicoError::NotAllocated)?;
        let padding = self.config.inter_module_padding;
        let replay = self.config.placement == PlacementStrategy::Replay;
        let limit = boundary.limit(self.catalog.len());

        let (mut offset, mut code_end) = if replay {
            (0, 0)
        } else {
            (exec.cursor, exec.code_end)
        };
        let mut placed = 0;

        for entry in self.catalog.entries_mut()[..limit].iter_mut() {
            if entry.placement.is_some() {
                if replay {
                    trace!("replaying PICO {} '{}' at {offset:#x}", entry.id, entry.name);
                    code_end = offset.saturating_add(entry.code_size);
                    offset = code_end.saturating_add(padding);
                }
                continue;
            }

            let available = exec.region.size();
            let needed = offset
                .checked_add(entry.code_size)
                .and_then(|n| n.checked_add(padding))
                .and_then(|n| n.checked_add(final_padding))
                .unwrap_or(usize::MAX);
            if needed > available {
                warn!(
                    "PICO {} '{}' does not fit: need {needed:#x} bytes, region has {available:#x}",
                    entry.id, entry.name
                );
                return Err(PicoError::InsufficientSpace { needed, available });
            }

            let mut data = match entry.data_size {
                0 => None,
                size => Some(
                    self.provider
                        .reserve_commit(size, RegionFlags::RW)
                        .ok_or(PicoError::AllocationFailed { size })?,
                ),
            };

            let addr = va!(exec.region.base().as_usize() + offset);
            let code = &mut exec.region.as_mut_slice()[offset..offset + entry.code_size];
            let mut no_data = [0u8; 0];
            let data_bytes: &mut [u8] = match data.as_mut() {
                Some(region) => region.as_mut_slice(),
                None => &mut no_data,
            };
            self.relocator.place(imports, entry.vault, code, data_bytes);

            entry.placement = Some(Placement {
                offset,
                len: entry.code_size,
                addr,
            });
            entry.entry_point = Some(self.relocator.entry_point(entry.vault, addr));
            entry.data = data;
            debug!(
                "placed PICO {} '{}' at offset {offset:#x} ({:#x} bytes), entry {:#x}",
                entry.id,
                entry.name,
                entry.code_size,
                entry.entry_point.map_or(0, |ep| ep.as_usize())
            );

            code_end = offset + entry.code_size;
            offset += entry.code_size + padding;
            if !replay {
                exec.cursor = offset;
                exec.code_end = code_end;
            }
            placed += 1;
        }

        exec.used = code_end;
        if placed > 0 {
            info!("loaded {placed} PICO(s), {:#x} bytes of code in use", exec.used);
        }
        Ok(())
    }

    /// Loads every registered entry.
    pub fn load_all(
        &mut self,
        final_padding: usize,
        imports: &dyn ImportResolver,
    ) -> PicoResult<()> {
        self.load(LoadBoundary::All, final_padding, imports)
    }
}
