//! Manager configuration constants.

/// Bytes reserved for a module name, terminator slot included.
pub const PICO_NAME_MAX_LENGTH: usize = 32;
pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_ARENA_SIZE: usize = 0x10_0000; // 1MB
pub const CODE_REGION_ALIGN: usize = 16;
pub const DATA_REGION_ALIGN: usize = 16;
