//! Boot loader - insert everything named in the module list files
use crate::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use crate::error::ModuleError;
use crate::kernel::live::load_live_modules;
use crate::loader::BootLoader;
use crate::registry::Registry;

pub struct LoadCommand {
    /// Path prefix of the list files; `*` is appended.
    pub prefix: String,
}

impl ModuleCommand for LoadCommand {
    fn name(&self) -> &str {
        "load"
    }

    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError> {
        // Boot continues even without a live listing.
        let mut registry = Registry::new();
        match load_live_modules(&context.config.proc_modules) {
            Ok(records) => {
                registry.add_live(records);
            }
            Err(e) => log::warn!("{}", e),
        }

        let locator = context.locator();
        let report = BootLoader::new(&mut registry, &locator, context.kernel).load_lists(&self.prefix)?;
        Ok(CommandOutput::Load(report))
    }
}
