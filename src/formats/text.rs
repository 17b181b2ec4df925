//! Text (table) output formatter for the module loader
use crate::error::ModuleError;
use crate::formats::traits::OutputFormatter;
use crate::kernel::ModuleRecord;
use crate::loader::LoadReport;
use crate::modinfo::ModInfo;
use crate::resolver::ResolveReport;
use prettytable::{Cell, Row, Table};

/// Text formatter that outputs data in a human-readable table format
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format_modules(&self, modules: &[ModuleRecord]) -> Result<String, ModuleError> {
        let mut table = Table::new();
        table.set_format(*prettytable::format::consts::FORMAT_CLEAN);

        table.set_titles(Row::new(vec![
            Cell::new("Module"),
            Cell::new("Size").style_spec("r"),
            Cell::new("Used").style_spec("r"),
            Cell::new("By"),
        ]));

        for module in modules {
            // The "-" marker prints as nothing.
            let users = if module.depends.is_empty() {
                String::new()
            } else {
                module.depends.to_csv()
            };
            table.add_row(Row::new(vec![
                Cell::new(&module.name),
                Cell::new(&module.size.to_string()).style_spec("r"),
                Cell::new(&module.usage_count.to_string()).style_spec("r"),
                Cell::new(&users),
            ]));
        }

        Ok(table.to_string())
    }

    fn format_modinfo(&self, info: &ModInfo) -> Result<String, ModuleError> {
        let mut table = Table::new();
        table.set_format(*prettytable::format::consts::FORMAT_CLEAN);

        table.add_row(Row::new(vec![
            Cell::new("module:"),
            Cell::new(&info.module.display().to_string()),
        ]));
        for entry in info.displayable() {
            table.add_row(Row::new(vec![
                Cell::new(&format!("{}:", entry.key)),
                Cell::new(&entry.value),
            ]));
        }

        Ok(table.to_string())
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<String, ModuleError> {
        let mut out = String::new();
        for name in &report.activated {
            out.push_str(&format!("loaded {}\n", name));
        }
        for failure in &report.failed {
            out.push_str(&format!("failed {}: {}\n", failure.name, failure.reason));
        }
        for stuck in &report.unresolved {
            out.push_str(&format!("{}\n", stuck.to_error()));
        }
        out.push_str(&format!(
            "{} loaded, {} failed, {} unresolved after {} passes\n",
            report.activated.len(),
            report.failed.len(),
            report.unresolved_count(),
            report.passes
        ));
        Ok(out)
    }

    fn format_load(&self, report: &LoadReport) -> Result<String, ModuleError> {
        Ok(format!(
            "{} loaded, {} already loaded, {} failed\n",
            report.loaded.len(),
            report.skipped.len(),
            report.failed.len()
        ))
    }
}
