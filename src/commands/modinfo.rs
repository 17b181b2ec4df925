//! modinfo - show a module's metadata
use crate::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use crate::error::ModuleError;
use crate::memory::ModuleImage;

pub struct ModinfoCommand {
    pub module: String,
}

impl ModuleCommand for ModinfoCommand {
    fn name(&self) -> &str {
        "modinfo"
    }

    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError> {
        let path = context.locator().locate(&self.module)?;
        let image = ModuleImage::open(&path)?;
        Ok(CommandOutput::ModInfo(image.modinfo()?))
    }
}
