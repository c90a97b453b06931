//! Executable layout needed to locate build information.
//!
//! Each supported object format is reduced to two things: the file range
//! of the section the linker puts build information in (if any), and a
//! list of loaded regions used to translate virtual addresses back into
//! file offsets.

use std::ops::Range;

use goblin::Object;
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::section_header::SHT_NOBITS;
use goblin::mach::Mach;

use crate::error::ReadError;

const ELF_BUILD_INFO_SECTION: &str = ".go.buildinfo";
const MACHO_BUILD_INFO_SECTION: &str = "__go_buildinfo";
const PE_BUILD_INFO_SECTION: &str = ".data";

/// A file-backed span of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub vaddr: u64,
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ExecutableImage {
    pub format: &'static str,
    pub regions: Vec<Region>,
    /// File range of the dedicated build-info section, when present.
    pub build_info_section: Option<Range<usize>>,
}

impl ExecutableImage {
    pub fn parse(bytes: &[u8]) -> Result<Self, ReadError> {
        let object =
            Object::parse(bytes).map_err(|e| ReadError::UnsupportedFormat(e.to_string()))?;

        let image = match object {
            Object::Elf(elf) => {
                let regions = elf
                    .program_headers
                    .iter()
                    .filter(|ph| ph.p_type == PT_LOAD)
                    .map(|ph| Region {
                        vaddr: ph.p_vaddr,
                        offset: ph.p_offset,
                        size: ph.p_filesz,
                    })
                    .collect();

                let build_info_section = elf
                    .section_headers
                    .iter()
                    .filter(|sh| sh.sh_type != SHT_NOBITS)
                    .find(|sh| elf.shdr_strtab.get_at(sh.sh_name) == Some(ELF_BUILD_INFO_SECTION))
                    .and_then(|sh| file_range(sh.sh_offset, sh.sh_size, bytes.len()));

                ExecutableImage {
                    format: "ELF",
                    regions,
                    build_info_section,
                }
            }
            Object::PE(pe) => {
                let mut regions = Vec::with_capacity(pe.sections.len());
                let mut build_info_section = None;

                for section in &pe.sections {
                    let offset = u64::from(section.pointer_to_raw_data);
                    let size = u64::from(section.size_of_raw_data);
                    regions.extend(pe_region(
                        pe.image_base,
                        section.virtual_address,
                        offset,
                        size,
                    ));
                    if build_info_section.is_none()
                        && section.name().ok() == Some(PE_BUILD_INFO_SECTION)
                    {
                        build_info_section = file_range(offset, size, bytes.len());
                    }
                }

                ExecutableImage {
                    format: "PE",
                    regions,
                    build_info_section,
                }
            }
            Object::Mach(Mach::Binary(macho)) => {
                let mut regions = Vec::new();
                let mut build_info_section = None;

                for segment in macho.segments.iter() {
                    regions.push(Region {
                        vaddr: segment.vmaddr,
                        offset: segment.fileoff,
                        size: segment.filesize,
                    });
                    let Ok(sections) = segment.sections() else {
                        continue;
                    };
                    for (section, _) in sections {
                        if build_info_section.is_none()
                            && section.name().ok() == Some(MACHO_BUILD_INFO_SECTION)
                        {
                            build_info_section =
                                file_range(u64::from(section.offset), section.size, bytes.len());
                        }
                    }
                }

                ExecutableImage {
                    format: "Mach-O",
                    regions,
                    build_info_section,
                }
            }
            Object::Mach(Mach::Fat(_)) => {
                return Err(ReadError::UnsupportedFormat(
                    "universal Mach-O binaries are not supported".into(),
                ));
            }
            Object::Unknown(magic) => {
                return Err(ReadError::UnsupportedFormat(format!(
                    "unknown magic {magic:#x}"
                )));
            }
            _ => {
                return Err(ReadError::UnsupportedFormat(
                    "object is not an executable".into(),
                ));
            }
        };

        Ok(image)
    }

    /// Translate `len` bytes at virtual address `vaddr` into a file range.
    ///
    /// The whole span must lie inside a single region.
    pub fn resolve(&self, vaddr: u64, len: u64) -> Option<Range<usize>> {
        self.regions.iter().find_map(|r| {
            let delta = vaddr.checked_sub(r.vaddr)?;
            let end = delta.checked_add(len)?;
            if end > r.size {
                return None;
            }
            let start = usize::try_from(r.offset.checked_add(delta)?).ok()?;
            let len = usize::try_from(len).ok()?;
            Some(start..start.checked_add(len)?)
        })
    }
}

/// Region for a PE section; `None` when the address does not fit in 64 bits.
fn pe_region(image_base: u64, virtual_address: u32, offset: u64, size: u64) -> Option<Region> {
    let vaddr = image_base.checked_add(u64::from(virtual_address))?;
    Some(Region {
        vaddr,
        offset,
        size,
    })
}

fn file_range(offset: u64, size: u64, file_len: usize) -> Option<Range<usize>> {
    let start = usize::try_from(offset).ok()?;
    let end = start.checked_add(usize::try_from(size).ok()?)?;
    (end <= file_len && start < end).then_some(start..end)
}
