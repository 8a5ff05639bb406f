//! Shared helpers: a tiny relocatable module format and a release-recording provider.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use memory_addr::{VirtAddr, va};
use pico_manager::{
    ArenaProvider, ExportTag, ImportResolver, Region, RegionFlags, RegionProvider, Relocator,
    Vault,
};

const MAGIC: &[u8; 4] = b"TPIC";

/// Builds modules in the "TPIC" format.
///
/// Header: magic, then `code_size`, `data_size`, `entry`, `export_count`,
/// `data_reloc_count`, `import_count` as little-endian u32. Then the export
/// table `(tag: i32, offset: u32)`, the data relocations `(code_offset: u32)`,
/// the imports `(code_offset: u32, lib_len: u8, lib, sym_len: u8, sym)`, the
/// code bytes and the initial data bytes.
///
/// A data relocation stores the absolute address of the writable region at
/// `code_offset`; an import stores the resolved address (or zero).
#[derive(Default)]
pub struct ModuleBuilder {
    code: Vec<u8>,
    data: Vec<u8>,
    entry: u32,
    exports: Vec<(ExportTag, u32)>,
    data_relocs: Vec<u32>,
    imports: Vec<(u32, String, String)>,
}

impl ModuleBuilder {
    pub fn new(code_size: usize, fill: u8) -> Self {
        Self {
            code: vec![fill; code_size],
            ..Self::default()
        }
    }

    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = data.to_vec();
        self
    }

    pub fn entry(mut self, offset: u32) -> Self {
        self.entry = offset;
        self
    }

    pub fn export(mut self, tag: ExportTag, offset: u32) -> Self {
        self.exports.push((tag, offset));
        self
    }

    pub fn data_reloc(mut self, code_offset: u32) -> Self {
        self.data_relocs.push(code_offset);
        self
    }

    pub fn import(mut self, code_offset: u32, lib: &str, sym: &str) -> Self {
        self.imports.push((code_offset, lib.into(), sym.into()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        for word in [
            self.code.len() as u32,
            self.data.len() as u32,
            self.entry,
            self.exports.len() as u32,
            self.data_relocs.len() as u32,
            self.imports.len() as u32,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        for (tag, offset) in &self.exports {
            out.extend_from_slice(&tag.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        for offset in &self.data_relocs {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        for (offset, lib, sym) in &self.imports {
            out.extend_from_slice(&offset.to_le_bytes());
            out.push(lib.len() as u8);
            out.extend_from_slice(lib.as_bytes());
            out.push(sym.len() as u8);
            out.extend_from_slice(sym.as_bytes());
        }
        out.extend_from_slice(&self.code);
        out.extend_from_slice(&self.data);
        out
    }
}

/// Module with `code_size` bytes of code and no data.
pub fn plain(code_size: usize, fill: u8) -> Vec<u8> {
    ModuleBuilder::new(code_size, fill).build()
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn u8(&mut self) -> u8 {
        let b = self.bytes[self.pos];
        self.pos += 1;
        b
    }

    fn u32(&mut self) -> u32 {
        let w = &self.bytes[self.pos..self.pos + 4];
        self.pos += 4;
        u32::from_le_bytes([w[0], w[1], w[2], w[3]])
    }

    fn str(&mut self) -> &'a str {
        let len = self.u8() as usize;
        let bytes: &'a [u8] = self.bytes;
        let s = std::str::from_utf8(&bytes[self.pos..self.pos + len]).unwrap();
        self.pos += len;
        s
    }
}

struct Parsed<'a> {
    code_size: usize,
    data_size: usize,
    entry: u32,
    exports: Vec<(ExportTag, u32)>,
    data_relocs: Vec<u32>,
    imports: Vec<(u32, &'a str, &'a str)>,
    code: &'a [u8],
    data: &'a [u8],
}

fn parse(bytes: &[u8]) -> Parsed<'_> {
    assert_eq!(&bytes[..4], MAGIC);
    let mut r = Reader { bytes, pos: 4 };
    let code_size = r.u32() as usize;
    let data_size = r.u32() as usize;
    let entry = r.u32();
    let (exports, relocs, imports) = (r.u32(), r.u32(), r.u32());
    let exports = (0..exports).map(|_| (r.u32() as i32, r.u32())).collect();
    let data_relocs = (0..relocs).map(|_| r.u32()).collect();
    let imports = (0..imports).map(|_| (r.u32(), r.str(), r.str())).collect();
    let code = &bytes[r.pos..r.pos + code_size];
    let data = &bytes[r.pos + code_size..r.pos + code_size + data_size];
    Parsed {
        code_size,
        data_size,
        entry,
        exports,
        data_relocs,
        imports,
        code,
        data,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TinyRelocator;

impl Relocator for TinyRelocator {
    fn code_size(&self, vault: Vault<'_>) -> usize {
        parse(vault.bytes()).code_size
    }

    fn data_size(&self, vault: Vault<'_>) -> usize {
        parse(vault.bytes()).data_size
    }

    fn place(
        &self,
        imports: &dyn ImportResolver,
        vault: Vault<'_>,
        code: &mut [u8],
        data: &mut [u8],
    ) {
        let module = parse(vault.bytes());
        code.copy_from_slice(module.code);
        data.copy_from_slice(module.data);
        let data_base = data.as_ptr() as u64;
        for &offset in &module.data_relocs {
            let at = offset as usize;
            code[at..at + 8].copy_from_slice(&data_base.to_le_bytes());
        }
        for &(offset, lib, sym) in &module.imports {
            let addr = imports.resolve(lib, sym).map_or(0, |p| p as u64);
            let at = offset as usize;
            code[at..at + 8].copy_from_slice(&addr.to_le_bytes());
        }
    }

    fn entry_point(&self, vault: Vault<'_>, code: VirtAddr) -> VirtAddr {
        va!(code.as_usize() + parse(vault.bytes()).entry as usize)
    }

    fn resolve_export(&self, vault: Vault<'_>, code: VirtAddr, tag: ExportTag) -> Option<VirtAddr> {
        parse(vault.bytes())
            .exports
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|&(_, offset)| va!(code.as_usize() + offset as usize))
    }
}

/// Arena provider that remembers the base address of every released region.
#[derive(Clone)]
pub struct RecordingProvider {
    pub arena: ArenaProvider,
    released: Rc<RefCell<Vec<usize>>>,
}

impl RecordingProvider {
    pub fn new(size: usize) -> Self {
        Self {
            arena: ArenaProvider::new(size),
            released: Rc::default(),
        }
    }

    pub fn released(&self) -> Vec<usize> {
        self.released.borrow().clone()
    }

    pub fn live(&self) -> usize {
        self.arena.live_regions()
    }
}

impl RegionProvider for RecordingProvider {
    fn reserve_commit(&self, size: usize, flags: RegionFlags) -> Option<Region> {
        self.arena.reserve_commit(size, flags)
    }

    fn release(&self, region: Region) {
        self.released.borrow_mut().push(region.base().as_usize());
        self.arena.release(region)
    }
}

pub fn read_u64(bytes: &[u8], at: usize) -> u64 {
    u64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
}
