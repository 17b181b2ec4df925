//! CSV output formatter for the module loader
use crate::error::ModuleError;
use crate::formats::traits::OutputFormatter;
use crate::kernel::ModuleRecord;
use crate::loader::LoadReport;
use crate::modinfo::ModInfo;
use crate::resolver::ResolveReport;
use csv::Writer;

/// CSV formatter that outputs data in comma-separated values format
pub struct CsvFormatter;

fn finish(wtr: Writer<Vec<u8>>) -> Result<String, ModuleError> {
    let data = wtr.into_inner()?;
    Ok(String::from_utf8(data)?)
}

impl OutputFormatter for CsvFormatter {
    fn format_modules(&self, modules: &[ModuleRecord]) -> Result<String, ModuleError> {
        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record(["name", "size", "used", "depends"])?;
        for module in modules {
            wtr.write_record(&[
                module.name.clone(),
                module.size.to_string(),
                module.usage_count.to_string(),
                module.depends.to_csv(),
            ])?;
        }

        wtr.flush()?;
        finish(wtr)
    }

    fn format_modinfo(&self, info: &ModInfo) -> Result<String, ModuleError> {
        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record(["key", "value"])?;
        wtr.write_record(["module", info.module.display().to_string().as_str()])?;
        for entry in info.displayable() {
            wtr.write_record([entry.key.as_str(), entry.value.as_str()])?;
        }

        wtr.flush()?;
        finish(wtr)
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<String, ModuleError> {
        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record(["name", "outcome", "detail"])?;
        for name in &report.activated {
            wtr.write_record([name.as_str(), "loaded", ""])?;
        }
        for failure in &report.failed {
            wtr.write_record([failure.name.as_str(), "failed", failure.reason.as_str()])?;
        }
        for stuck in &report.unresolved {
            wtr.write_record([stuck.name.as_str(), "unresolved", stuck.missing.join(",").as_str()])?;
        }

        wtr.flush()?;
        finish(wtr)
    }

    fn format_load(&self, report: &LoadReport) -> Result<String, ModuleError> {
        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record(["name", "outcome"])?;
        for name in &report.loaded {
            wtr.write_record([name.as_str(), "loaded"])?;
        }
        for name in &report.skipped {
            wtr.write_record([name.as_str(), "skipped"])?;
        }
        for name in &report.failed {
            wtr.write_record([name.as_str(), "failed"])?;
        }

        wtr.flush()?;
        finish(wtr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Dependencies;

    #[test]
    fn test_modules_csv() {
        let modules = vec![
            ModuleRecord::active("usbcore", Dependencies::parse("usb_storage,ehci_hcd"), 331776, 4),
            ModuleRecord::active("loop", Dependencies::None, 32768, 0),
        ];
        let out = CsvFormatter.format_modules(&modules).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name,size,used,depends");
        assert_eq!(lines[1], "usbcore,331776,4,\"usb_storage,ehci_hcd\"");
        assert_eq!(lines[2], "loop,32768,0,-");
    }
}
