//! Kernel module records and naming rules
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::ModuleError;

pub mod insert;
pub mod live;
pub mod syscall;

pub use insert::{insert_module, remove_module};
pub use syscall::{KernelInterface, SyscallKernel};

/// Canonical module name: every `-` becomes `_`.
pub fn canonical_name(name: &str) -> String {
    name.replace('-', "_")
}

/// On-disk spelling of a module name: every `_` becomes `-`.
///
/// Only used when probing for module files.
pub fn disk_name(name: &str) -> String {
    name.replace('_', "-")
}

/// Derive the canonical module name from a file path or bare name.
///
/// The directory part is dropped and everything from the first `.ko` on is
/// cut, so `net/e1000e.ko` and `e1000e.ko.xz` both give `e1000e`.
pub fn module_name_from_path(path: &str) -> Option<String> {
    let base = Path::new(path).file_name()?.to_str()?;
    let stem = match base.find(".ko") {
        Some(at) => &base[..at],
        None => base,
    };
    if stem.is_empty() {
        return None;
    }
    Some(canonical_name(stem))
}

/// Declared dependencies of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Dependencies {
    /// The kernel's `-` marker: the module needs nothing.
    None,
    Names(Vec<String>),
}

impl Default for Dependencies {
    fn default() -> Self {
        Dependencies::Names(Vec::new())
    }
}

impl Dependencies {
    /// Parse a comma-separated list; `-` is the "no dependencies" marker.
    /// Empty items (trailing commas) are ignored.
    pub fn parse(csv: &str) -> Self {
        let csv = csv.trim();
        if csv == "-" {
            return Dependencies::None;
        }
        Dependencies::Names(
            csv.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn names(&self) -> &[String] {
        match self {
            Dependencies::None => &[],
            Dependencies::Names(names) => names,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    /// Comma-joined form, `-` when there are none.
    pub fn to_csv(&self) -> String {
        if self.is_empty() {
            "-".to_string()
        } else {
            self.names().join(",")
        }
    }
}

/// Lifecycle of a module within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleState {
    /// Metadata known, not a load candidate.
    Scanned,
    /// Marked for insertion.
    Pending,
    /// Inserted by us or already running.
    Active,
    /// Insertion attempted and refused; never retried.
    Failed,
}

impl ModuleState {
    pub fn can_become(self, next: ModuleState) -> bool {
        matches!(
            (self, next),
            (ModuleState::Scanned, ModuleState::Pending)
                | (ModuleState::Pending, ModuleState::Active)
                | (ModuleState::Pending, ModuleState::Failed)
        )
    }
}

/// One kernel module, known from the live list or from disk.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    pub depends: Dependencies,
    pub size: u64,
    pub usage_count: u32,
    state: ModuleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Why metadata could not be read, for records kept with empty metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

impl ModuleRecord {
    /// A module the kernel reports as running.
    pub fn active(name: &str, depends: Dependencies, size: u64, usage_count: u32) -> Self {
        ModuleRecord {
            name: canonical_name(name),
            depends,
            size,
            usage_count,
            state: ModuleState::Active,
            path: None,
            problem: None,
        }
    }

    /// A module found on disk.
    pub fn scanned(name: &str, path: PathBuf, depends: Dependencies, size: u64) -> Self {
        ModuleRecord {
            name: canonical_name(name),
            depends,
            size,
            usage_count: 0,
            state: ModuleState::Scanned,
            path: Some(path),
            problem: None,
        }
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ModuleState::Active
    }

    /// Move to `next`, refusing anything outside
    /// Scanned -> Pending -> Active | Failed.
    pub fn transition(&mut self, next: ModuleState) -> Result<(), ModuleError> {
        if !self.state.can_become(next) {
            return Err(ModuleError::InvalidTransition {
                name: self.name.clone(),
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_is_idempotent() {
        for name in ["snd-hda-intel", "snd_hda_intel", "nf_conntrack-ipv4", "e1000e", ""] {
            let once = canonical_name(name);
            assert_eq!(canonical_name(&once), once);
            let disk = disk_name(name);
            assert_eq!(disk_name(&disk), disk);
        }
    }

    #[test]
    fn test_normalization_directions_are_inverse() {
        assert_eq!(canonical_name(&disk_name("snd_hda_intel")), "snd_hda_intel");
        assert_eq!(disk_name(&canonical_name("snd-hda-intel")), "snd-hda-intel");
        assert!(!canonical_name("a-b_c-d").contains('-'));
        assert!(!disk_name("a-b_c-d").contains('_'));
    }

    #[test]
    fn test_module_name_from_path() {
        assert_eq!(
            module_name_from_path("/lib/modules/6.1.0/snd-hda-intel.ko").as_deref(),
            Some("snd_hda_intel")
        );
        assert_eq!(module_name_from_path("e1000e.ko.xz").as_deref(), Some("e1000e"));
        assert_eq!(module_name_from_path("usb-storage").as_deref(), Some("usb_storage"));
        assert_eq!(module_name_from_path("/lib/modules/"), Some("modules".to_string()));
        assert_eq!(module_name_from_path(".ko"), None);
    }

    #[test]
    fn test_dependencies_parse() {
        assert_eq!(Dependencies::parse("-"), Dependencies::None);
        assert_eq!(Dependencies::parse(""), Dependencies::Names(vec![]));
        assert_eq!(
            Dependencies::parse("usbcore,scsi_mod,"),
            Dependencies::Names(vec!["usbcore".into(), "scsi_mod".into()])
        );
        assert_eq!(Dependencies::None.to_csv(), "-");
        assert_eq!(Dependencies::parse("a,b").to_csv(), "a,b");
        assert!(Dependencies::None.names().is_empty());
    }

    #[test]
    fn test_state_transitions() {
        let mut record = ModuleRecord::scanned("loop", PathBuf::from("loop.ko"), Dependencies::None, 10);
        assert!(record.transition(ModuleState::Active).is_err());
        record.transition(ModuleState::Pending).unwrap();
        record.transition(ModuleState::Failed).unwrap();
        assert!(matches!(
            record.transition(ModuleState::Pending),
            Err(ModuleError::InvalidTransition { from: ModuleState::Failed, .. })
        ));
        assert_eq!(record.state(), ModuleState::Failed);

        let mut live = ModuleRecord::active("ext4", Dependencies::None, 0, 1);
        assert!(live.transition(ModuleState::Pending).is_err());
        assert!(live.is_active());
    }

    #[test]
    fn test_record_names_are_canonical() {
        let record = ModuleRecord::active("snd-pcm", Dependencies::None, 0, 0);
        assert_eq!(record.name, "snd_pcm");
    }
}
