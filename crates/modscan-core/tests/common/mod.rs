//! Synthetic executables carrying build information.
//!
//! Images are minimal little-endian ELF64 files with a single `PT_LOAD`
//! segment mapping the whole file at `BASE_VADDR`, followed by a
//! build-info header at a 16-byte aligned offset.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

pub const BASE_VADDR: u64 = 0x40_0000;
pub const TOOLCHAIN: &str = "go1.21.4";

const EHDR_LEN: usize = 64;
const PHDR_LEN: usize = 56;
const PAYLOAD_AT: usize = 128;
const MAGIC: &[u8; 14] = b"\xff Go buildinf:";

pub const TYPICAL_LEDGER: &str = "path\texample.com/cmd/tool
mod\texample.com/cmd/tool\t(devel)\t
dep\tgithub.com/fatih/color\tv1.7.0\th1:DkWD4oS2D8LGGgTQ6IvwJJXSL5Vp2ffcQg58nFV38Ys=
dep\tgithub.com/foo/bar\tv1.2.3\th1:AAA=
=>\tgithub.com/foo/bar2\tv0.0.0-x\th1:BBB=
dep\tgithub.com/mattn/go-isatty\tv0.0.4
build\t-compiler=gc
";

/// Wrap a ledger in the 16-byte sentinels the linker writes around it.
pub fn framed(ledger: &str) -> Vec<u8> {
    [&[0x30; 16][..], ledger.as_bytes(), &[0xf9; 16][..]].concat()
}

fn uvarint(mut value: usize, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Newer layout: both strings inline after the header.
pub fn inline_image(module_info: &[u8]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(MAGIC);
    payload.push(8);
    payload.push(0x2);
    payload.resize(32, 0);
    uvarint(TOOLCHAIN.len(), &mut payload);
    payload.extend_from_slice(TOOLCHAIN.as_bytes());
    uvarint(module_info.len(), &mut payload);
    payload.extend_from_slice(module_info);
    elf_image(&payload)
}

/// Older layout: header pointers to `(data, len)` string headers.
pub fn pointer_image(module_info: &[u8]) -> Vec<u8> {
    let vaddr = |offset: usize| BASE_VADDR + offset as u64;

    let version_hdr = PAYLOAD_AT + 32;
    let module_hdr = version_hdr + 16;
    let version_data = module_hdr + 16;
    let module_data = version_data + TOOLCHAIN.len();

    let mut payload = Vec::new();
    payload.extend_from_slice(MAGIC);
    payload.push(8);
    payload.push(0x0);
    payload.extend_from_slice(&vaddr(version_hdr).to_le_bytes());
    payload.extend_from_slice(&vaddr(module_hdr).to_le_bytes());
    payload.extend_from_slice(&vaddr(version_data).to_le_bytes());
    payload.extend_from_slice(&(TOOLCHAIN.len() as u64).to_le_bytes());
    payload.extend_from_slice(&vaddr(module_data).to_le_bytes());
    payload.extend_from_slice(&(module_info.len() as u64).to_le_bytes());
    payload.extend_from_slice(TOOLCHAIN.as_bytes());
    payload.extend_from_slice(module_info);
    elf_image(&payload)
}

/// An ELF image without any build-info header.
pub fn plain_elf() -> Vec<u8> {
    elf_image(&[0u8; 64])
}

fn elf_image(payload: &[u8]) -> Vec<u8> {
    let total = (PAYLOAD_AT + payload.len()) as u64;
    let mut out = Vec::with_capacity(total as usize);

    // ELF64 header
    out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
    out.resize(16, 0);
    out.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    out.extend_from_slice(&0x3eu16.to_le_bytes()); // x86-64
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&BASE_VADDR.to_le_bytes());
    out.extend_from_slice(&(EHDR_LEN as u64).to_le_bytes()); // e_phoff
    out.extend_from_slice(&0u64.to_le_bytes()); // e_shoff
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(EHDR_LEN as u16).to_le_bytes());
    out.extend_from_slice(&(PHDR_LEN as u16).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
    out.extend_from_slice(&64u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
    out.extend_from_slice(&0u16.to_le_bytes());

    // PT_LOAD covering the whole file
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&5u32.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&BASE_VADDR.to_le_bytes());
    out.extend_from_slice(&BASE_VADDR.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&0x1000u64.to_le_bytes());

    out.resize(PAYLOAD_AT, 0);
    out.extend_from_slice(payload);
    out
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write image");
    file.flush().expect("flush");
    file
}
