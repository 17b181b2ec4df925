//! Library crate for the kernel module loader

pub mod commands;
pub mod config;
pub mod elf;
pub mod error;
pub mod formats;
pub mod kernel;
pub mod loader;
pub mod memory;
pub mod modinfo;
pub mod registry;
pub mod resolver;

// CLI modules
pub mod cli {
    pub mod args;
}
