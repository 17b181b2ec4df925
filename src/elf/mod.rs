//! Section lookup for ELF object files
//!
//! Kernel modules are relocatable ELF objects. Only the section header table
//! and the section-name string table are needed to find `.modinfo`, so this
//! module reads exactly those and nothing else. Every offset taken from the
//! image is checked against the buffer before it is used.
use goblin::container::{Container, Ctx};
use goblin::elf::section_header::{SectionHeader, SHN_XINDEX, SHT_NOBITS};
use goblin::elf::Elf;
use log::debug;
use thiserror::Error;

/// Name of the section holding `key=value` module metadata.
pub const MODINFO_SECTION: &str = ".modinfo";

const SIZEOF_SHDR32: usize = 40;
const SIZEOF_SHDR64: usize = 64;

/// Failure while locating a section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("section {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Malformed(String),
}

/// Byte range of a section's contents inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    pub offset: usize,
    pub size: usize,
}

impl SectionRange {
    /// Borrow the section contents out of the image it was found in.
    ///
    /// The range was validated against that image, so slicing cannot fail
    /// as long as the same buffer is passed back.
    pub fn slice<'a>(&self, image: &'a [u8]) -> &'a [u8] {
        &image[self.offset..self.offset + self.size]
    }
}

/// Convert an (offset, size) pair from a header into a range inside `len` bytes.
fn checked_range(offset: u64, size: u64, len: usize, what: &str) -> Result<SectionRange, SectionError> {
    let offset = usize::try_from(offset)
        .map_err(|_| SectionError::Malformed(format!("{} offset 0x{:x} overflows", what, offset)))?;
    let size = usize::try_from(size)
        .map_err(|_| SectionError::Malformed(format!("{} size 0x{:x} overflows", what, size)))?;
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(SectionRange { offset, size }),
        _ => Err(SectionError::Malformed(format!(
            "{} at 0x{:x}+0x{:x} exceeds image of {} bytes",
            what, offset, size, len
        ))),
    }
}

/// Locate the section called `name` and return the byte range of its contents.
///
/// Both 32-bit and 64-bit images in either byte order are accepted; the layout
/// is taken from the identification bytes rather than the host word size.
pub fn find_section(image: &[u8], name: &str) -> Result<SectionRange, SectionError> {
    let header = Elf::parse_header(image).map_err(|e| SectionError::Malformed(e.to_string()))?;
    let container = header
        .container()
        .map_err(|e| SectionError::Malformed(e.to_string()))?;
    let endian = header
        .endianness()
        .map_err(|e| SectionError::Malformed(e.to_string()))?;

    if header.e_shoff == 0 {
        return Err(SectionError::NotFound(name.to_string()));
    }

    let shdr_size = match container {
        Container::Big => SIZEOF_SHDR64,
        Container::Little => SIZEOF_SHDR32,
    };
    if header.e_shentsize as usize != shdr_size {
        return Err(SectionError::Malformed(format!(
            "section header entry size {} (expected {})",
            header.e_shentsize, shdr_size
        )));
    }

    // The first entry must at least be readable; it carries the real count
    // when e_shnum overflows.
    let table = checked_range(header.e_shoff, shdr_size as u64, image.len(), "section header table")?;
    if header.e_shnum > 0 {
        checked_range(
            header.e_shoff,
            header.e_shnum as u64 * shdr_size as u64,
            image.len(),
            "section header table",
        )?;
    }

    let ctx = Ctx::new(container, endian);
    let headers = SectionHeader::parse(image, table.offset, header.e_shnum as usize, ctx)
        .map_err(|e| SectionError::Malformed(e.to_string()))?;
    debug!(
        "ELF image: {:?}, {} section headers at 0x{:x}",
        container,
        headers.len(),
        table.offset
    );

    let strndx = if header.e_shstrndx as u32 == SHN_XINDEX {
        headers.first().map(|sh| sh.sh_link as usize).unwrap_or(0)
    } else {
        header.e_shstrndx as usize
    };
    let strtab_header = headers.get(strndx).ok_or_else(|| {
        SectionError::Malformed(format!(
            "section name table index {} out of {} sections",
            strndx,
            headers.len()
        ))
    })?;
    let strtab_range = checked_range(
        strtab_header.sh_offset,
        strtab_header.sh_size,
        image.len(),
        "section name table",
    )?;
    let names = strtab_range.slice(image);

    for sh in &headers {
        if section_name(names, sh.sh_name) != Some(name.as_bytes()) {
            continue;
        }
        // NOBITS sections occupy no file space whatever sh_size claims.
        if sh.sh_type == SHT_NOBITS {
            return checked_range(sh.sh_offset.min(image.len() as u64), 0, image.len(), name);
        }
        return checked_range(sh.sh_offset, sh.sh_size, image.len(), name);
    }

    Err(SectionError::NotFound(name.to_string()))
}

/// NUL-terminated name at `offset` in the section-name table. Names are
/// compared as bytes; they need not be UTF-8.
fn section_name(names: &[u8], offset: usize) -> Option<&[u8]> {
    let rest = names.get(offset..)?;
    let end = memchr::memchr(0, rest)?;
    Some(&rest[..end])
}
