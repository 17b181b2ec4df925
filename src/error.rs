//! Custom error types for the module loader
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::kernel::ModuleState;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read full module {}: got {actual} of {expected} bytes", .path.display())]
    ShortRead {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("malformed module image {}: {reason}", .path.display())]
    MalformedImage { path: PathBuf, reason: String },

    #[error("failed to load the {section} section from {}", .path.display())]
    SectionNotFound { path: PathBuf, section: String },

    #[error("cannot find module - {name}{}", tried_suffix(.tried))]
    NameNotResolved { name: String, tried: Vec<PathBuf> },

    #[error("module {name} ({}) has unresolved dependencies: {}", file_or_none(.path), .missing.join(","))]
    DependencyUnresolved {
        name: String,
        path: Option<PathBuf>,
        missing: Vec<String>,
    },

    #[error("failed to insert {}: {source}", .path.display())]
    InsertionRejected {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unloading the module {name} failed: {source}")]
    RemovalRejected {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("module is already loaded - {0}")]
    AlreadyActive(String),

    #[error("module is not loaded - {0}")]
    NotActive(String),

    #[error("module {name}: illegal state change {from:?} -> {to:?}")]
    InvalidTransition {
        name: String,
        from: ModuleState,
        to: ModuleState,
    },

    #[error("invalid module parameters: {0}")]
    InvalidOptions(String),

    #[error("bad glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV into_inner error: {0}")]
    CsvIntoInner(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),

    #[error("UTF-8 conversion error: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

fn file_or_none(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "no file".to_string(),
    }
}

fn tried_suffix(tried: &[PathBuf]) -> String {
    if tried.is_empty() {
        return String::new();
    }
    let paths: Vec<String> = tried.iter().map(|p| p.display().to_string()).collect();
    format!(" (tried {})", paths.join(", "))
}

impl ModuleError {
    /// A name with no record and no file lookup behind it.
    pub fn unknown_module(name: impl Into<String>) -> Self {
        ModuleError::NameNotResolved {
            name: name.into(),
            tried: Vec::new(),
        }
    }

    /// Wrap an I/O failure with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ModuleError::Io {
            path: path.into(),
            source,
        }
    }

    /// The errno reported by the kernel, if this error came from a syscall.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            ModuleError::InsertionRejected { source, .. }
            | ModuleError::RemovalRejected { source, .. }
            | ModuleError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}
