//! Read-only memory mapping of module files
use crate::elf::{self, SectionError, MODINFO_SECTION};
use crate::error::ModuleError;
use crate::modinfo::{parse_modinfo, ModInfo};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Memory mapped module file. The mapping is released when this is dropped.
pub struct ModuleImage {
    _file: File,
    path: PathBuf,
    mapped: Mmap,
}

impl ModuleImage {
    /// Map the module file at `path` read-only.
    pub fn open(path: &Path) -> Result<Self, ModuleError> {
        let file = File::open(path).map_err(|e| ModuleError::io(path, e))?;
        let mapped = unsafe { Mmap::map(&file) }.map_err(|e| ModuleError::io(path, e))?;
        Ok(ModuleImage {
            _file: file,
            path: path.to_path_buf(),
            mapped,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mapped
    }

    /// Get the size of the mapped file
    pub fn len(&self) -> usize {
        self.mapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapped.is_empty()
    }

    /// Contents of the named section.
    pub fn section(&self, name: &str) -> Result<&[u8], ModuleError> {
        match elf::find_section(self.bytes(), name) {
            Ok(range) => Ok(range.slice(self.bytes())),
            Err(SectionError::NotFound(section)) => Err(ModuleError::SectionNotFound {
                path: self.path.clone(),
                section,
            }),
            Err(SectionError::Malformed(reason)) => Err(ModuleError::MalformedImage {
                path: self.path.clone(),
                reason,
            }),
        }
    }

    /// Parse the `.modinfo` section.
    pub fn modinfo(&self) -> Result<ModInfo, ModuleError> {
        let section = self.section(MODINFO_SECTION)?;
        Ok(ModInfo::new(self.path.clone(), parse_modinfo(section)))
    }
}
