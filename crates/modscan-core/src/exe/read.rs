use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::debug;

use crate::error::ReadError;
use crate::exe::regions::ExecutableImage;

/// Marks the start of the build-info header.
pub const BUILD_INFO_MAGIC: &[u8; 14] = b"\xff Go buildinf:";

/// Header size and alignment as laid out by the linker.
const HEADER_LEN: usize = 32;
const HEADER_ALIGN: usize = 16;

const FLAG_BIG_ENDIAN: u8 = 0x1;
const FLAG_INLINE_STRINGS: u8 = 0x2;

/// Module info is framed by 16-byte sentinels on both ends.
const SENTINEL_LEN: usize = 16;

/// Raw build information embedded in an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Toolchain release the executable was built with, e.g. "go1.21.0".
    pub toolchain_version: String,

    /// Raw dependency ledger; empty when the binary carries none.
    pub module_info: String,
}

/// Read an executable from disk and extract its embedded build information.
pub fn read_build_info(path: &Path) -> Result<BuildInfo, ReadError> {
    let bytes = fs::read(path)?;
    extract_build_info(&bytes)
}

/// Extract build information from the bytes of an executable.
///
/// The header is searched for in the dedicated build-info section first
/// and then across the whole file. Two header layouts exist: newer
/// toolchains store both strings inline after the header, older ones store
/// pointers to string headers that must be resolved through the image's
/// address map.
pub fn extract_build_info(bytes: &[u8]) -> Result<BuildInfo, ReadError> {
    let image = ExecutableImage::parse(bytes)?;

    let header_at = image
        .build_info_section
        .clone()
        .and_then(|range| find_header(bytes, range))
        .or_else(|| find_header(bytes, 0..bytes.len()))
        .ok_or(ReadError::NotFound)?;

    debug!(
        format = image.format,
        offset = header_at,
        "located build-info header"
    );

    let header = &bytes[header_at..header_at + HEADER_LEN];
    let ptr_size = usize::from(header[14]);
    let flags = header[15];

    let (toolchain_version, module_info) = if flags & FLAG_INLINE_STRINGS != 0 {
        let mut rest = &bytes[header_at + HEADER_LEN..];
        let version = take_varint_string(&mut rest)?;
        let module_info = take_varint_string(&mut rest)?;
        (version, module_info)
    } else {
        let reader = PointerReader::new(&image, bytes, ptr_size, flags & FLAG_BIG_ENDIAN != 0)?;
        let version_at = reader.read_ptr(&header[16..])?;
        let module_info_at = reader.read_ptr(&header[16 + ptr_size..])?;
        (
            reader.read_string(version_at)?,
            reader.read_string(module_info_at)?,
        )
    };

    let info = BuildInfo {
        toolchain_version: String::from_utf8_lossy(&toolchain_version).into_owned(),
        module_info: String::from_utf8_lossy(strip_sentinels(&module_info)).into_owned(),
    };
    debug!(
        toolchain = %info.toolchain_version,
        module_info_len = info.module_info.len(),
        "read build information"
    );

    Ok(info)
}

/// Offset of the first aligned header within `range`, if any.
fn find_header(bytes: &[u8], range: Range<usize>) -> Option<usize> {
    let end = range.end.min(bytes.len());
    let mut at = range.start;
    while at + HEADER_LEN <= end {
        if bytes[at..].starts_with(BUILD_INFO_MAGIC) {
            return Some(at);
        }
        at += HEADER_ALIGN;
    }
    None
}

fn take_varint_string(data: &mut &[u8]) -> Result<Vec<u8>, ReadError> {
    let (len, used) = read_uvarint(data)
        .ok_or_else(|| ReadError::Malformed("bad string length prefix".into()))?;
    let rest = &data[used..];
    let len = usize::try_from(len)
        .ok()
        .filter(|&len| len <= rest.len())
        .ok_or_else(|| ReadError::Malformed("string runs past end of file".into()))?;
    let value = rest[..len].to_vec();
    *data = &rest[len..];
    Ok(value)
}

/// Unsigned LEB128; returns the value and the number of bytes consumed.
fn read_uvarint(data: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate().take(10) {
        let bits = u64::from(byte & 0x7f);
        if i == 9 && byte > 1 {
            return None;
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

fn strip_sentinels(module_info: &[u8]) -> &[u8] {
    let len = module_info.len();
    if len > 2 * SENTINEL_LEN && module_info[len - SENTINEL_LEN - 1] == b'\n' {
        &module_info[SENTINEL_LEN..len - SENTINEL_LEN]
    } else {
        &[]
    }
}

/// Resolves pointer-format headers through the image's address map.
struct PointerReader<'a> {
    image: &'a ExecutableImage,
    bytes: &'a [u8],
    ptr_size: usize,
    big_endian: bool,
}

impl<'a> PointerReader<'a> {
    fn new(
        image: &'a ExecutableImage,
        bytes: &'a [u8],
        ptr_size: usize,
        big_endian: bool,
    ) -> Result<Self, ReadError> {
        if ptr_size != 4 && ptr_size != 8 {
            return Err(ReadError::Malformed(format!(
                "unsupported pointer size {ptr_size}"
            )));
        }
        Ok(Self {
            image,
            bytes,
            ptr_size,
            big_endian,
        })
    }

    fn read_ptr(&self, data: &[u8]) -> Result<u64, ReadError> {
        let raw = data
            .get(..self.ptr_size)
            .ok_or_else(|| ReadError::Malformed("truncated pointer".into()))?;
        let mut buf = [0u8; 8];
        let value = match (self.ptr_size, self.big_endian) {
            (4, false) => u64::from(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            (4, true) => u64::from(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]])),
            (_, false) => {
                buf.copy_from_slice(raw);
                u64::from_le_bytes(buf)
            }
            (_, true) => {
                buf.copy_from_slice(raw);
                u64::from_be_bytes(buf)
            }
        };
        Ok(value)
    }

    fn read_at(&self, vaddr: u64, len: u64) -> Result<&'a [u8], ReadError> {
        self.image
            .resolve(vaddr, len)
            .and_then(|range| self.bytes.get(range))
            .ok_or_else(|| ReadError::Malformed(format!("address {vaddr:#x} is not mapped")))
    }

    /// Reads a `(data pointer, length)` string header at `vaddr`.
    fn read_string(&self, vaddr: u64) -> Result<Vec<u8>, ReadError> {
        let header = self.read_at(vaddr, 2 * self.ptr_size as u64)?;
        let data_at = self.read_ptr(header)?;
        let len = self.read_ptr(&header[self.ptr_size..])?;
        Ok(self.read_at(data_at, len)?.to_vec())
    }
}
