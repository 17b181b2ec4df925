//! Parser for the `.modinfo` section of a kernel module
use memchr::memchr;
use serde::Serialize;
use std::path::PathBuf;

use crate::kernel::Dependencies;

/// Key naming the comma-separated dependency list.
pub const DEPENDS_KEY: &str = "depends";

/// One `key=value` string from the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModInfoEntry {
    pub key: String,
    pub value: String,
}

impl ModInfoEntry {
    /// `parm` and `parmtype` entries describe module parameters; they are
    /// formatting hints for display, not data the resolver consumes.
    pub fn is_parameter(&self) -> bool {
        self.key.starts_with("parm")
    }
}

/// Split a `.modinfo` section into its `key=value` entries.
///
/// Entries are NUL-terminated; runs of NUL padding between them are skipped.
/// An entry without `=` ends parsing and whatever was collected so far is
/// returned.
pub fn parse_modinfo(section: &[u8]) -> Vec<ModInfoEntry> {
    let mut entries = Vec::new();
    let mut pos = 0usize;

    while pos < section.len() {
        if section[pos] == 0 {
            pos += 1;
            continue;
        }

        let rest = &section[pos..];
        let end = memchr(0, rest).unwrap_or(rest.len());
        let raw = &rest[..end];

        let Some(sep) = memchr(b'=', raw) else {
            log::debug!(
                "modinfo entry at 0x{:x} has no '=', stopping ({} entries kept)",
                pos,
                entries.len()
            );
            break;
        };

        entries.push(ModInfoEntry {
            key: String::from_utf8_lossy(&raw[..sep]).into_owned(),
            value: String::from_utf8_lossy(&raw[sep + 1..]).into_owned(),
        });
        pos += end + 1;
    }

    entries
}

/// Dependency names declared by the `depends` entry.
///
/// The literal value `-` and an empty value both mean "no dependencies".
pub fn dependency_list(entries: &[ModInfoEntry]) -> Vec<String> {
    entries
        .iter()
        .find(|e| e.key == DEPENDS_KEY)
        .map(|e| Dependencies::parse(&e.value).names().to_vec())
        .unwrap_or_default()
}

/// Metadata of one module file.
#[derive(Debug, Clone, Serialize)]
pub struct ModInfo {
    pub module: PathBuf,
    pub entries: Vec<ModInfoEntry>,
}

impl ModInfo {
    pub fn new(module: PathBuf, entries: Vec<ModInfoEntry>) -> Self {
        ModInfo { module, entries }
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Declared dependencies. A module with no `depends` entry has none.
    pub fn dependencies(&self) -> Dependencies {
        match self.get(DEPENDS_KEY) {
            Some(value) => Dependencies::parse(value),
            None => Dependencies::Names(Vec::new()),
        }
    }

    /// Entries shown to the user (parameter descriptions are hidden).
    pub fn displayable(&self) -> impl Iterator<Item = &ModInfoEntry> {
        self.entries.iter().filter(|e| !e.is_parameter())
    }
}
