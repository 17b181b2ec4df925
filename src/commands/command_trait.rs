//! Command trait for the module loader
use crate::config::Config;
use crate::error::ModuleError;
use crate::kernel::live::load_live_modules;
use crate::kernel::{KernelInterface, ModuleRecord};
use crate::loader::LoadReport;
use crate::modinfo::ModInfo;
use crate::registry::{ModuleLocator, Registry};
use crate::resolver::ResolveReport;

/// Everything a command needs from the outside world
pub struct CommandContext<'a> {
    pub config: &'a Config,
    pub kernel: &'a dyn KernelInterface,
}

impl CommandContext<'_> {
    pub fn locator(&self) -> ModuleLocator {
        ModuleLocator::new(self.config.module_dir())
    }

    /// Registry holding only the live module list.
    pub fn live_registry(&self) -> Result<Registry, ModuleError> {
        let mut registry = Registry::new();
        registry.add_live(load_live_modules(&self.config.proc_modules)?);
        Ok(registry)
    }
}

/// Output from commands
pub enum CommandOutput {
    Modules(Vec<ModuleRecord>),
    ModInfo(ModInfo),
    Resolution(ResolveReport),
    Load(LoadReport),
    /// Nothing to print beyond log lines.
    Done,
}

/// Trait that all loader commands implement
pub trait ModuleCommand {
    /// Get the name of the command
    fn name(&self) -> &str;

    /// Run the command with the provided context
    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError>;
}
