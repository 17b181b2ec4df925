//! JSONL (JSON Lines) output formatter for the module loader
use crate::error::ModuleError;
use crate::formats::traits::OutputFormatter;
use crate::kernel::ModuleRecord;
use crate::loader::LoadReport;
use crate::modinfo::{ModInfo, ModInfoEntry};
use crate::resolver::ResolveReport;
use serde::Serialize;

/// JSONL formatter that outputs data as JSON objects, one per line
pub struct JsonlFormatter;

fn lines<'a, T: Serialize + 'a>(items: impl IntoIterator<Item = &'a T>) -> Result<String, ModuleError> {
    let mut output = String::new();
    for item in items {
        output.push_str(&serde_json::to_string(item)?);
        output.push('\n');
    }
    Ok(output)
}

impl OutputFormatter for JsonlFormatter {
    fn format_modules(&self, modules: &[ModuleRecord]) -> Result<String, ModuleError> {
        lines(modules)
    }

    fn format_modinfo(&self, info: &ModInfo) -> Result<String, ModuleError> {
        let module = ModInfoEntry {
            key: "module".to_string(),
            value: info.module.display().to_string(),
        };
        lines(std::iter::once(&module).chain(info.displayable()))
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<String, ModuleError> {
        Ok(format!("{}\n", serde_json::to_string(report)?))
    }

    fn format_load(&self, report: &LoadReport) -> Result<String, ModuleError> {
        Ok(format!("{}\n", serde_json::to_string(report)?))
    }
}
