//! Borrowed source buffers.

use core::fmt;

use memory_addr::{VirtAddr, va};

use crate::{PicoError, PicoResult};

/// The caller-owned, unrelocated bytes of a module.
///
/// The manager only borrows the buffer: every (re)load places the module from
/// it again, so it must outlive every entry registered with it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Vault<'v> {
    bytes: &'v [u8],
}

impl<'v> Vault<'v> {
    pub fn new(bytes: &'v [u8]) -> PicoResult<Self> {
        if bytes.is_empty() {
            return Err(PicoError::InvalidArgument("empty source buffer"));
        }
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &'v [u8] {
        self.bytes
    }

    pub fn addr(&self) -> VirtAddr {
        va!(self.bytes.as_ptr() as usize)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether both handles borrow the very same buffer.
    pub fn same_buffer(&self, other: &Vault<'_>) -> bool {
        core::ptr::eq(self.bytes, other.bytes)
    }
}

impl fmt::Debug for Vault<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vault({:#x}, {:#x} bytes)", self.addr().as_usize(), self.len())
    }
}
