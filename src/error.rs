//! Unified error types for the PICO manager.
//!
//! Manager operations return [`PicoResult`], whose error is the closed
//! [`PicoError`] taxonomy. Nothing is retried internally: growing the
//! executable region and loading again is the caller's move, usually through
//! [`PicoManager::duplicate`](crate::PicoManager::duplicate).
//!
//! Ambient surfaces that only report failures (configuration loading) use
//! [`AnyResult`], an alias for `anyhow::Result`:
//! ```ignore
//! let text = std::fs::read_to_string(path)
//!     .context("Failed to read manager config")?;
//! anyhow::ensure!(config.capacity > 0, "capacity must be positive");
//! ```

/// Errors produced by the manager and its collaborators.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PicoError {
    #[error("Catalog is full ({0} entries)")]
    CapacityExceeded(usize),
    #[error("No such module")]
    NotFound,
    #[error("Memory primitive refused {size:#x} bytes")]
    AllocationFailed { size: usize },
    #[error("Executable region too small: need {needed:#x} bytes, have {available:#x}")]
    InsufficientSpace { needed: usize, available: usize },
    #[error("Executable region not allocated")]
    NotAllocated,
    #[error("Executable region already allocated")]
    AlreadyAllocated,
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Logger already initialized")]
    LoggerInitFailed,
}

/// Result type alias for manager operations.
pub type PicoResult<T> = Result<T, PicoError>;

/// Result type alias using anyhow::Error.
///
/// This provides flexible error handling with context and error chaining.
pub type AnyResult<T> = anyhow::Result<T>;
