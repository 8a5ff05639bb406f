//! Bounded module names.

use core::fmt;
use core::ops::Deref;

use crate::config::limits::PICO_NAME_MAX_LENGTH;

/// Longest name kept, in bytes.
pub const NAME_CAPACITY: usize = PICO_NAME_MAX_LENGTH - 1;

/// Cuts `name` to at most [`NAME_CAPACITY`] bytes, on a char boundary.
pub fn truncate(name: &str) -> &str {
    if name.len() <= NAME_CAPACITY {
        return name;
    }
    let mut end = NAME_CAPACITY;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// A module name of at most [`NAME_CAPACITY`] bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PicoName(String);

impl PicoName {
    /// Builds a name, silently dropping whatever exceeds the capacity.
    pub fn new(name: &str) -> Self {
        Self(truncate(name).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive match after truncating `query` like a stored name.
    pub fn matches(&self, query: &str) -> bool {
        self.0 == truncate(query)
    }
}

impl Deref for PicoName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PicoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PicoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
