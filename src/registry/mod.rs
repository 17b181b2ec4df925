//! In-memory collection of module records keyed by canonical name
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ModuleError;
use crate::kernel::live::load_live_modules;
use crate::kernel::{canonical_name, module_name_from_path, Dependencies, ModuleRecord, ModuleState};
use crate::memory::ModuleImage;

pub mod locate;

pub use locate::ModuleLocator;

/// Module records of one run. Names are unique; listing follows insertion
/// order.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<ModuleRecord>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&canonical_name(name))
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.index
            .get(&canonical_name(name))
            .map(|&i| &self.records[i])
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut ModuleRecord> {
        match self.index.get(&canonical_name(name)) {
            Some(&i) => Some(&mut self.records[i]),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.records.iter()
    }

    /// Records currently in `state`.
    pub fn in_state(&self, state: ModuleState) -> impl Iterator<Item = &ModuleRecord> {
        self.records.iter().filter(move |m| m.state() == state)
    }

    /// Add `record` unless its name is already known. The first writer wins;
    /// returns whether the record was added.
    pub fn insert(&mut self, record: ModuleRecord) -> bool {
        if self.index.contains_key(&record.name) {
            return false;
        }
        self.index.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Merge records from the live module listing. Returns how many were new.
    pub fn add_live(&mut self, records: Vec<ModuleRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.insert(record) {
                added += 1;
            }
        }
        added
    }

    /// Read the live listing at `path` and merge it.
    pub fn load_live(&mut self, path: &Path) -> Result<usize, ModuleError> {
        let added = self.add_live(load_live_modules(path)?);
        debug!("{} live modules from {}", added, path.display());
        Ok(added)
    }

    /// Scan module files matching `pattern` and add the unknown ones as
    /// `Scanned`. A file whose metadata cannot be read is still added, with
    /// empty dependencies and the failure noted on the record.
    pub fn scan_directory(&mut self, pattern: &str) -> Result<usize, ModuleError> {
        let mut added = 0;
        for entry in glob::glob(pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("skipping {}: {}", e.path().display(), e.error());
                    continue;
                }
            };
            if path.is_dir() {
                continue;
            }
            let Some(name) = path.to_str().and_then(module_name_from_path) else {
                continue;
            };
            if self.contains(&name) {
                continue;
            }
            if self.insert(scan_module(&name, path)) {
                added += 1;
            }
        }
        debug!("scanned {} new modules from {}", added, pattern);
        Ok(added)
    }

    /// Apply a checked state change to `name`.
    pub fn transition(&mut self, name: &str, next: ModuleState) -> Result<(), ModuleError> {
        self.get_mut(name)
            .ok_or_else(|| ModuleError::unknown_module(name))?
            .transition(next)
    }

    /// Mark one module for loading.
    pub fn mark_pending(&mut self, name: &str) -> Result<(), ModuleError> {
        match self.get(name).map(|m| m.state()) {
            None => Err(ModuleError::unknown_module(name)),
            Some(ModuleState::Active) => Err(ModuleError::AlreadyActive(canonical_name(name))),
            Some(ModuleState::Pending) => Ok(()),
            Some(_) => self.transition(name, ModuleState::Pending),
        }
    }

    /// Mark `name` and every scanned module it transitively depends on for
    /// loading. Dependencies that are unknown, active, or already marked are
    /// left alone. Returns the names newly marked, `name` first.
    pub fn mark_pending_with_dependencies(&mut self, name: &str) -> Result<Vec<String>, ModuleError> {
        self.mark_pending(name)?;
        let mut marked = vec![canonical_name(name)];
        let mut queue = marked.clone();

        while let Some(current) = queue.pop() {
            let depends: Vec<String> = match self.get(&current) {
                Some(record) => record.depends.names().to_vec(),
                None => continue,
            };
            for dep in depends {
                if self.get(&dep).map(|m| m.state()) == Some(ModuleState::Scanned) {
                    self.transition(&dep, ModuleState::Pending)?;
                    let dep = canonical_name(&dep);
                    marked.push(dep.clone());
                    queue.push(dep);
                }
            }
        }
        Ok(marked)
    }
}

/// Build a `Scanned` record for the module file at `path`.
fn scan_module(name: &str, path: PathBuf) -> ModuleRecord {
    let image = match ModuleImage::open(&path) {
        Ok(image) => image,
        Err(e) => {
            warn!("failed to open {}: {}", path.display(), e);
            let mut record = ModuleRecord::scanned(name, path, Dependencies::default(), 0);
            record.problem = Some(e.to_string());
            return record;
        }
    };

    let size = image.len() as u64;
    match image.modinfo() {
        Ok(info) => ModuleRecord::scanned(name, path, info.dependencies(), size),
        Err(e) => {
            warn!("{}", e);
            let mut record = ModuleRecord::scanned(name, path, Dependencies::default(), size);
            record.problem = Some(e.to_string());
            record
        }
    }
}
