//! Output format module for the module loader
pub mod csv;
pub mod json;
pub mod jsonl;
pub mod text;
pub mod traits;
