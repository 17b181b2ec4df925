//! Parser for the kernel's live module list (`/proc/modules`)
//!
//! Each line reads `name size usage_count dependency_csv [state address ...]`
//! where the dependency field is `-` when empty.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{Dependencies, ModuleRecord};
use crate::error::ModuleError;

/// Parse one line of the live listing. Lines missing the name or the
/// dependency field are skipped; unparsable counts read as zero.
pub fn parse_live_line(line: &str) -> Option<ModuleRecord> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let size = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let usage = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let depends = fields.next()?;

    Some(ModuleRecord::active(
        name,
        Dependencies::parse(depends),
        size,
        usage,
    ))
}

/// Read every record from a live listing source.
pub fn read_live_modules<R: BufRead>(reader: R) -> Result<Vec<ModuleRecord>, std::io::Error> {
    let mut records = Vec::new();
    for line_result in reader.lines() {
        let line = line_result?;
        match parse_live_line(&line) {
            Some(record) => records.push(record),
            None if !line.trim().is_empty() => {
                log::debug!("skipping unparsable live module line: {:?}", line);
            }
            None => {}
        }
    }
    Ok(records)
}

/// Read the live listing from a file such as `/proc/modules`.
pub fn load_live_modules(path: &Path) -> Result<Vec<ModuleRecord>, ModuleError> {
    let file = File::open(path).map_err(|e| ModuleError::io(path, e))?;
    read_live_modules(BufReader::new(file)).map_err(|e| ModuleError::io(path, e))
}
