//! rmmod - unload a module
use log::info;

use crate::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use crate::error::ModuleError;
use crate::kernel::{module_name_from_path, remove_module};

pub struct RmmodCommand {
    pub module: String,
    pub force: bool,
}

impl ModuleCommand for RmmodCommand {
    fn name(&self) -> &str {
        "rmmod"
    }

    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError> {
        let name = module_name_from_path(&self.module)
            .ok_or_else(|| ModuleError::unknown_module(self.module.as_str()))?;

        if !context.live_registry()?.contains(&name) {
            return Err(ModuleError::NotActive(name));
        }

        remove_module(context.kernel, &name, self.force)?;
        info!("removed {}", name);
        Ok(CommandOutput::Done)
    }
}
