//! insmod - insert a single module
use log::info;

use crate::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use crate::error::ModuleError;
use crate::kernel::{insert_module, module_name_from_path};

pub struct InsmodCommand {
    pub module: String,
    pub params: Vec<String>,
}

impl InsmodCommand {
    /// Module parameters joined into the kernel's parameter string.
    pub fn options(&self) -> Result<String, ModuleError> {
        let options = self.params.join(" ");
        if options.contains('\0') {
            return Err(ModuleError::InvalidOptions(options.replace('\0', "\\0")));
        }
        Ok(options)
    }
}

impl ModuleCommand for InsmodCommand {
    fn name(&self) -> &str {
        "insmod"
    }

    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError> {
        let name = module_name_from_path(&self.module)
            .ok_or_else(|| ModuleError::unknown_module(self.module.as_str()))?;

        if context.live_registry()?.contains(&name) {
            return Err(ModuleError::AlreadyActive(name));
        }

        let options = self.options()?;
        let path = context.locator().locate(&self.module)?;
        insert_module(context.kernel, &path, &options)?;
        info!("inserted {} from {}", name, path.display());
        Ok(CommandOutput::Done)
    }
}
