//! Output format traits for the module loader
use crate::error::ModuleError;
use crate::kernel::ModuleRecord;
use crate::loader::LoadReport;
use crate::modinfo::ModInfo;
use crate::resolver::ResolveReport;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    fn format_modules(&self, modules: &[ModuleRecord]) -> Result<String, ModuleError>;
    fn format_modinfo(&self, info: &ModInfo) -> Result<String, ModuleError>;
    fn format_resolution(&self, report: &ResolveReport) -> Result<String, ModuleError>;
    fn format_load(&self, report: &LoadReport) -> Result<String, ModuleError>;
}

/// Enum for output format types
#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
    Jsonl,
}

/// Enum for output destination
#[derive(Debug, Clone)]
pub enum OutputDestination {
    Stdout,
    File(std::path::PathBuf),
}

/// Output writer that combines format and destination
pub struct OutputWriter {
    formatter: Box<dyn OutputFormatter>,
    destination: OutputDestination,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, destination: OutputDestination) -> Self {
        let formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(crate::formats::text::TextFormatter),
            OutputFormat::Csv => Box::new(crate::formats::csv::CsvFormatter),
            OutputFormat::Json => Box::new(crate::formats::json::JsonFormatter),
            OutputFormat::Jsonl => Box::new(crate::formats::jsonl::JsonlFormatter),
        };

        Self {
            formatter,
            destination,
        }
    }

    fn emit(&self, content: String) -> Result<(), ModuleError> {
        match &self.destination {
            OutputDestination::Stdout => {
                print!("{}", content);
                if !content.ends_with('\n') {
                    println!();
                }
            }
            OutputDestination::File(path) => {
                std::fs::write(path, content).map_err(|e| ModuleError::io(path, e))?;
            }
        }
        Ok(())
    }

    /// Write a module listing to the configured destination
    pub fn write_modules(&self, modules: &[ModuleRecord]) -> Result<(), ModuleError> {
        self.emit(self.formatter.format_modules(modules)?)
    }

    pub fn write_modinfo(&self, info: &ModInfo) -> Result<(), ModuleError> {
        self.emit(self.formatter.format_modinfo(info)?)
    }

    pub fn write_resolution(&self, report: &ResolveReport) -> Result<(), ModuleError> {
        self.emit(self.formatter.format_resolution(report)?)
    }

    pub fn write_load(&self, report: &LoadReport) -> Result<(), ModuleError> {
        self.emit(self.formatter.format_load(report)?)
    }
}
