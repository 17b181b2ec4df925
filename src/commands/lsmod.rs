//! lsmod - list loaded modules
use regex::Regex;

use crate::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use crate::error::ModuleError;
use crate::kernel::ModuleState;

pub struct LsmodCommand {
    /// Only list modules whose name matches
    pub name: Option<String>,
}

impl ModuleCommand for LsmodCommand {
    fn name(&self) -> &str {
        "lsmod"
    }

    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError> {
        let filter = self.name.as_deref().map(Regex::new).transpose()?;
        let registry = context.live_registry()?;

        let modules = registry
            .in_state(ModuleState::Active)
            .filter(|m| filter.as_ref().map_or(true, |re| re.is_match(&m.name)))
            .cloned()
            .collect();
        Ok(CommandOutput::Modules(modules))
    }
}
