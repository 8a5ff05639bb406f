//! PICO module management.
//!
//! A PICO is a relocatable, position-independent code module loaded from a
//! caller-supplied source buffer. Code of every placed module shares one
//! executable region; each module's mutable data lives in its own writable
//! region.

pub mod catalog;
pub mod entry;
mod export;
mod lifecycle;
pub mod loader;
pub mod manager;
#[cfg(test)]
pub(crate) mod mock;
pub mod name;
pub mod relocator;
pub mod vault;

pub use catalog::Catalog;
pub use entry::{PicoEntry, PicoId, Placement};
pub use loader::LoadBoundary;
pub use manager::{ExecRegion, PicoManager};
pub use name::PicoName;
pub use relocator::{ExportTag, ImportResolver, PicoMain, Relocator};
pub use vault::Vault;
