//! A toy module format for unit tests.
//!
//! Layout (little endian): `code_size: u32`, `data_size: u32`, `entry: u32`,
//! `export_count: u32`, `export_count` pairs of `(tag: i32, offset: u32)`,
//! then `code_size` code bytes and `data_size` data bytes.

use memory_addr::{VirtAddr, va};

use super::relocator::{ExportTag, ImportResolver, Relocator};
use super::Vault;

const HEADER: usize = 16;

fn word(bytes: &[u8], at: usize) -> u32 {
    bytes
        .get(at..at + 4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .unwrap_or(0)
}

/// Builds a module with `code_size` bytes of code filled with `fill`.
pub fn module(code_size: u32, data_size: u32, fill: u8, exports: &[(ExportTag, u32)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for w in [code_size, data_size, 0, exports.len() as u32] {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    for &(tag, offset) in exports {
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&offset.to_le_bytes());
    }
    bytes.extend(std::iter::repeat_n(fill, code_size as usize));
    bytes.extend(std::iter::repeat_n(fill.wrapping_add(1), data_size as usize));
    bytes
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockRelocator;

impl MockRelocator {
    fn code_start(vault: Vault<'_>) -> usize {
        HEADER + word(vault.bytes(), 12) as usize * 8
    }
}

impl Relocator for MockRelocator {
    fn code_size(&self, vault: Vault<'_>) -> usize {
        word(vault.bytes(), 0) as usize
    }

    fn data_size(&self, vault: Vault<'_>) -> usize {
        word(vault.bytes(), 4) as usize
    }

    fn place(
        &self,
        _imports: &dyn ImportResolver,
        vault: Vault<'_>,
        code: &mut [u8],
        data: &mut [u8],
    ) {
        let start = Self::code_start(vault);
        let bytes = vault.bytes();
        code.copy_from_slice(&bytes[start..start + code.len()]);
        let start = start + code.len();
        data.copy_from_slice(&bytes[start..start + data.len()]);
    }

    fn entry_point(&self, vault: Vault<'_>, code: VirtAddr) -> VirtAddr {
        va!(code.as_usize() + word(vault.bytes(), 8) as usize)
    }

    fn resolve_export(&self, vault: Vault<'_>, code: VirtAddr, tag: ExportTag) -> Option<VirtAddr> {
        let bytes = vault.bytes();
        (0..word(bytes, 12) as usize)
            .map(|i| HEADER + i * 8)
            .find(|&at| word(bytes, at) as i32 == tag)
            .map(|at| va!(code.as_usize() + word(bytes, at + 4) as usize))
    }
}
