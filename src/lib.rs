//! pico_manager - loader and lifetime manager for position-independent code
//! modules (PICOs).
//!
//! Modules are registered from caller-owned source buffers, placed into one
//! shared executable region, and each given its own writable data region.
//! They can be loaded in phases, removed one by one, or migrated as a whole
//! into a freshly sized region.
//!
//! ```ignore
//! let mut mgr = PicoManager::new(MyFormat, MmapProvider, ManagerConfig::default().padding(16));
//! mgr.register("hooks", &hooks)?;
//! mgr.register("payload", &payload)?;
//! mgr.allocate_exec_region(0x100)?;
//! mgr.load(LoadBoundary::UpTo(0), 0x100, &imports)?; // hooks first
//! mgr.load(LoadBoundary::All, 0x100, &imports)?;
//! let run = mgr.export_by_name("payload", 1);
//! ```

#[macro_use]
extern crate log;

pub mod config;
pub mod console;
mod error;
pub mod mm;
pub mod pico;

pub use config::{Headroom, ManagerConfig, PlacementStrategy};
pub use error::{AnyResult, PicoError, PicoResult};
#[cfg(all(unix, feature = "mmap"))]
pub use mm::MmapProvider;
pub use mm::{ArenaProvider, Region, RegionFlags, RegionProvider};
pub use pico::{
    ExportTag, ImportResolver, LoadBoundary, PicoEntry, PicoId, PicoMain, PicoManager, Placement,
    Relocator, Vault,
};
