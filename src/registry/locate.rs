//! Finding the file behind a module name
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::ModuleError;
use crate::kernel::disk_name;

/// Resolves module names to files under one release directory.
pub struct ModuleLocator {
    module_dir: PathBuf,
}

impl ModuleLocator {
    pub fn new(module_dir: PathBuf) -> Self {
        ModuleLocator { module_dir }
    }

    /// Find the file for `name`.
    ///
    /// Tried in order: `name` as a literal path, `<dir>/<name>.ko`, and
    /// `<dir>/<name>.ko` with underscores spelled as hyphens. A trailing
    /// `.ko` on `name` is dropped before looking in the module directory.
    pub fn locate(&self, name: &str) -> Result<PathBuf, ModuleError> {
        let literal = Path::new(name);
        if literal.is_file() {
            return Ok(literal.to_path_buf());
        }

        let stem = name.strip_suffix(".ko").unwrap_or(name);
        let mut tried = vec![literal.to_path_buf()];
        for file_name in [stem.to_string(), disk_name(stem)] {
            let candidate = self.module_dir.join(format!("{}.ko", file_name));
            if tried.contains(&candidate) {
                continue;
            }
            if candidate.is_file() {
                return Ok(candidate);
            }
            tried.push(candidate);
        }

        debug!("no file for {} in {}", name, self.module_dir.display());
        Err(ModuleError::NameNotResolved {
            name: name.to_string(),
            tried,
        })
    }
}
