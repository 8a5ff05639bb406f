//! Entry catalog - fixed-capacity, densely packed module records.

use super::entry::{PicoEntry, PicoId};
use super::{PicoName, Vault};
use crate::{PicoError, PicoResult};

/// Ordered module records; an entry's position is its id.
#[derive(Debug)]
pub struct Catalog<'v> {
    entries: Vec<PicoEntry<'v>>,
    capacity: usize,
}

impl<'v> Catalog<'v> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Appends an unplaced entry at position `len()`.
    pub fn push(
        &mut self,
        name: &str,
        vault: Vault<'v>,
        code_size: usize,
        data_size: usize,
    ) -> PicoResult<PicoId> {
        if name.is_empty() {
            return Err(PicoError::InvalidArgument("empty module name"));
        }
        if self.is_full() {
            return Err(PicoError::CapacityExceeded(self.capacity));
        }
        let id = self.entries.len();
        self.entries
            .push(PicoEntry::new(id, PicoName::new(name), vault, code_size, data_size));
        Ok(id)
    }

    pub fn get(&self, id: PicoId) -> Option<&PicoEntry<'v>> {
        self.entries.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: PicoId) -> Option<&mut PicoEntry<'v>> {
        self.entries.get_mut(id)
    }

    /// Position of the first entry called `name`.
    pub fn position(&self, name: &str) -> Option<PicoId> {
        self.entries.iter().position(|entry| entry.name.matches(name))
    }

    pub fn find(&self, name: &str) -> Option<&PicoEntry<'v>> {
        self.position(name).and_then(|id| self.get(id))
    }

    /// Takes the entry at `id` out and shifts the later entries left,
    /// renumbering them to their new positions.
    pub fn remove(&mut self, id: PicoId) -> PicoResult<PicoEntry<'v>> {
        if id >= self.entries.len() {
            return Err(PicoError::NotFound);
        }
        let removed = self.entries.remove(id);
        for (pos, entry) in self.entries.iter_mut().enumerate().skip(id) {
            entry.id = pos;
        }
        Ok(removed)
    }

    /// Empties the catalog, handing back every entry.
    pub fn drain(&mut self) -> Vec<PicoEntry<'v>> {
        core::mem::take(&mut self.entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PicoEntry<'v>> {
        self.entries.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [PicoEntry<'v>] {
        &mut self.entries
    }

    /// Sum of all code sizes plus `padding` between adjacent entries,
    /// saturating at `usize::MAX`.
    pub fn total_code_size(&self, padding: usize) -> usize {
        let count = self.entries.len();
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if i + 1 < count {
                    entry.code_size.saturating_add(padding)
                } else {
                    entry.code_size
                }
            })
            .fold(0, usize::saturating_add)
    }
}
