//! Boot-time loading from module list files
//!
//! Each list file holds one request per line: `module_name[ options...]`.
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::ModuleError;
use crate::kernel::{insert_module, module_name_from_path, Dependencies, KernelInterface, ModuleRecord};
use crate::registry::{ModuleLocator, Registry};

/// One line of a load list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub name: String,
    pub options: String,
}

/// Parse one load-list line. Blank lines and `#` comments give `None`.
pub fn parse_request(line: &str) -> Option<LoadRequest> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (name, options) = match line.split_once(' ') {
        Some((name, options)) => (name, options.trim()),
        None => (line, ""),
    };
    Some(LoadRequest {
        name: name.to_string(),
        options: options.to_string(),
    })
}

pub fn parse_load_list(content: &str) -> Vec<LoadRequest> {
    content.lines().filter_map(parse_request).collect()
}

/// Summary of a boot loading run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Walks load lists and inserts every requested module not yet active.
pub struct BootLoader<'a> {
    registry: &'a mut Registry,
    locator: &'a ModuleLocator,
    kernel: &'a dyn KernelInterface,
}

impl<'a> BootLoader<'a> {
    pub fn new(
        registry: &'a mut Registry,
        locator: &'a ModuleLocator,
        kernel: &'a dyn KernelInterface,
    ) -> Self {
        BootLoader {
            registry,
            locator,
            kernel,
        }
    }

    /// Process every list file whose path starts with `prefix`, in sorted
    /// order.
    pub fn load_lists(&mut self, prefix: &str) -> Result<LoadReport, ModuleError> {
        let pattern = format!("{}*", prefix);
        info!("kmodloader: loading kernel modules from {}", pattern);

        let mut report = LoadReport::default();
        for entry in glob::glob(&pattern)? {
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
            if let Err(e) = self.load_list(&path, &mut report) {
                error!("{}", e);
            }
        }
        Ok(report)
    }

    /// Process one list file.
    pub fn load_list(&mut self, path: &Path, report: &mut LoadReport) -> Result<(), ModuleError> {
        let content = fs::read_to_string(path).map_err(|e| ModuleError::io(path, e))?;
        debug!("reading load list {}", path.display());
        for request in parse_load_list(&content) {
            self.load(&request, report);
        }
        Ok(())
    }

    /// Handle one request. Failures are recorded, never propagated.
    pub fn load(&mut self, request: &LoadRequest, report: &mut LoadReport) {
        let Some(name) = module_name_from_path(&request.name) else {
            warn!("ignoring load request {:?}", request.name);
            return;
        };

        if self.registry.contains(&name) {
            debug!("{} is already loaded", name);
            report.skipped.push(name);
            return;
        }

        let result = self
            .locator
            .locate(&request.name)
            .and_then(|path| insert_module(self.kernel, &path, &request.options));
        match result {
            Ok(()) => {
                info!("loaded {}", name);
                self.registry
                    .insert(ModuleRecord::active(&name, Dependencies::None, 0, 0));
                report.loaded.push(name);
            }
            Err(e) => {
                error!("failed to load {}: {}", name, e);
                report.failed.push(name);
            }
        }
    }
}
