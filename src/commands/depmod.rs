//! depmod - load modules together with their dependencies
use log::{debug, info};

use crate::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use crate::error::ModuleError;
use crate::kernel::module_name_from_path;
use crate::resolver::{resolve, KernelInserter};

pub struct DepmodCommand {
    pub modules: Vec<String>,
}

impl ModuleCommand for DepmodCommand {
    fn name(&self) -> &str {
        "depmod"
    }

    fn run(&self, context: &CommandContext) -> Result<CommandOutput, ModuleError> {
        let mut registry = context.live_registry()?;
        let pattern = context.config.scan_pattern();
        registry.scan_directory(&pattern)?;
        debug!("{} modules known after scanning {}", registry.len(), pattern);

        for module in &self.modules {
            let name = module_name_from_path(module)
                .ok_or_else(|| ModuleError::unknown_module(module.as_str()))?;
            let marked = registry.mark_pending_with_dependencies(&name)?;
            info!("{} pending: {}", name, marked.join(" "));
        }

        let locator = context.locator();
        let mut inserter = KernelInserter::new(&locator, context.kernel);
        let report = resolve(&mut registry, &mut inserter);
        Ok(CommandOutput::Resolution(report))
    }
}
