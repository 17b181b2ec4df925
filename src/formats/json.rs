//! JSON output formatter for the module loader
use crate::error::ModuleError;
use crate::formats::traits::OutputFormatter;
use crate::kernel::ModuleRecord;
use crate::loader::LoadReport;
use crate::modinfo::{ModInfo, ModInfoEntry};
use crate::resolver::ResolveReport;
use serde::Serialize;

#[derive(Serialize)]
struct OutputWrapper<T> {
    command: String,
    timestamp: String,
    count: usize,
    results: T,
}

fn wrap<T: Serialize>(command: &str, count: usize, results: T) -> Result<String, ModuleError> {
    let wrapper = OutputWrapper {
        command: command.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        count,
        results,
    };
    Ok(serde_json::to_string_pretty(&wrapper)?)
}

/// JSON formatter that outputs data in JSON format with metadata
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_modules(&self, modules: &[ModuleRecord]) -> Result<String, ModuleError> {
        wrap("lsmod", modules.len(), modules)
    }

    fn format_modinfo(&self, info: &ModInfo) -> Result<String, ModuleError> {
        #[derive(Serialize)]
        struct Shown<'a> {
            module: &'a std::path::Path,
            entries: Vec<&'a ModInfoEntry>,
        }
        let shown = Shown {
            module: &info.module,
            entries: info.displayable().collect(),
        };
        wrap("modinfo", shown.entries.len(), shown)
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<String, ModuleError> {
        wrap("depmod", report.activated.len(), report)
    }

    fn format_load(&self, report: &LoadReport) -> Result<String, ModuleError> {
        wrap("load", report.loaded.len(), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Dependencies;

    #[test]
    fn test_modules_json() {
        let modules = vec![ModuleRecord::active("loop", Dependencies::None, 32768, 1)];
        let out = JsonFormatter.format_modules(&modules).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["command"], "lsmod");
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["name"], "loop");
        assert_eq!(value["results"][0]["state"], "active");
        assert!(value["results"][0]["depends"].is_null());
    }
}
