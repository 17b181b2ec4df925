//! Dependency-driven module loading
//!
//! Resolution works in passes. Each pass takes a snapshot of the pending
//! modules whose dependencies are all active and tries to insert them. The
//! loop stops after the first pass that inserts nothing, so with `N` pending
//! modules there are at most `N + 1` passes. Modules that never become
//! eligible (missing dependency, cycle, dependency that failed) stay pending
//! and are reported.
use log::{debug, error, info};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::ModuleError;
use crate::kernel::{insert_module, KernelInterface, ModuleRecord, ModuleState};
use crate::registry::{ModuleLocator, Registry};

/// Performs the insertion of one module whose dependencies are satisfied.
pub trait Inserter {
    fn insert(&mut self, record: &ModuleRecord) -> Result<(), ModuleError>;
}

/// Locates the module file and inserts it with no parameters.
pub struct KernelInserter<'a> {
    locator: &'a ModuleLocator,
    kernel: &'a dyn KernelInterface,
}

impl<'a> KernelInserter<'a> {
    pub fn new(locator: &'a ModuleLocator, kernel: &'a dyn KernelInterface) -> Self {
        KernelInserter { locator, kernel }
    }
}

impl Inserter for KernelInserter<'_> {
    fn insert(&mut self, record: &ModuleRecord) -> Result<(), ModuleError> {
        let path = match &record.path {
            Some(path) if path.is_file() => path.clone(),
            _ => self.locator.locate(&record.name)?,
        };
        insert_module(self.kernel, &path, "")
    }
}

/// A module whose insertion was refused.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub name: String,
    pub reason: String,
}

/// A module still pending after resolution, with the dependencies that never
/// became active.
#[derive(Debug, Clone, Serialize)]
pub struct Unresolved {
    pub name: String,
    pub path: Option<PathBuf>,
    pub missing: Vec<String>,
}

impl Unresolved {
    pub fn to_error(&self) -> ModuleError {
        ModuleError::DependencyUnresolved {
            name: self.name.clone(),
            path: self.path.clone(),
            missing: self.missing.clone(),
        }
    }
}

/// Outcome of one resolution run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveReport {
    pub passes: usize,
    /// Modules inserted, in insertion order.
    pub activated: Vec<String>,
    pub failed: Vec<Failure>,
    pub unresolved: Vec<Unresolved>,
}

impl ResolveReport {
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }
}

/// Dependencies of `record` that are not active in `registry`.
pub fn missing_dependencies(registry: &Registry, record: &ModuleRecord) -> Vec<String> {
    record
        .depends
        .names()
        .iter()
        .filter(|dep| !registry.get(dep).is_some_and(ModuleRecord::is_active))
        .cloned()
        .collect()
}

/// Pending modules whose every dependency is active, in registry order.
pub fn ready_modules(registry: &Registry) -> Vec<String> {
    registry
        .in_state(ModuleState::Pending)
        .filter(|m| missing_dependencies(registry, m).is_empty())
        .map(|m| m.name.clone())
        .collect()
}

/// Insert pending modules in dependency order until no more progress is
/// possible.
pub fn resolve(registry: &mut Registry, inserter: &mut dyn Inserter) -> ResolveReport {
    let mut report = ResolveReport::default();

    loop {
        report.passes += 1;
        let ready = ready_modules(registry);
        let mut loaded = 0;

        for name in ready {
            let outcome = match registry.get(&name) {
                Some(record) => inserter.insert(record),
                None => continue,
            };
            let next = match outcome {
                Ok(()) => {
                    info!("loaded {}", name);
                    report.activated.push(name.clone());
                    loaded += 1;
                    ModuleState::Active
                }
                Err(e) => {
                    error!("failed to load {}: {}", name, e);
                    report.failed.push(Failure {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                    ModuleState::Failed
                }
            };
            if let Err(e) = registry.transition(&name, next) {
                error!("{}", e);
            }
        }

        let remaining = registry.in_state(ModuleState::Pending).count();
        debug!(
            "pass {}: loaded {} modules, {} still pending",
            report.passes, loaded, remaining
        );
        if loaded == 0 {
            break;
        }
    }

    report.unresolved = registry
        .in_state(ModuleState::Pending)
        .map(|m| Unresolved {
            name: m.name.clone(),
            path: m.path.clone(),
            missing: missing_dependencies(registry, m),
        })
        .collect();
    for stuck in &report.unresolved {
        info!("{}", stuck.to_error());
    }

    report
}
