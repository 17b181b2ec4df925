//! Command-line argument parsing for the module loader
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_LOAD_LIST_DIR, DEFAULT_MODULE_ROOT, DEFAULT_PROC_MODULES};

/// Names under which the binary implies a subcommand.
pub const APPLETS: [&str; 5] = ["insmod", "rmmod", "lsmod", "modinfo", "depmod"];

#[derive(Parser)]
#[command(name = "kmodloader")]
#[command(about = "Load, inspect and unload Linux kernel modules", long_about = None)]
pub struct Cli {
    /// Command to run (default: load modules from the boot lists)
    #[command(subcommand)]
    pub command: Option<LoaderCommand>,

    /// Live module list
    #[arg(long, value_name = "FILE", default_value = DEFAULT_PROC_MODULES, global = true)]
    pub proc_modules: PathBuf,

    /// Root of the per-release module directories
    #[arg(long, value_name = "DIR", default_value = DEFAULT_MODULE_ROOT, global = true)]
    pub module_root: PathBuf,

    /// Kernel release (default: the running kernel)
    #[arg(long, value_name = "RELEASE", global = true)]
    pub release: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormatArg,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Enable verbose output (status messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum LoaderCommand {
    /// Insert a module
    Insmod {
        /// Module name or path
        module: String,

        /// Module parameters
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Unload a module
    Rmmod {
        /// Module name
        module: String,

        /// Unload even if the module is in use
        #[arg(long)]
        force: bool,
    },

    /// List loaded modules
    Lsmod {
        /// Filter by module name (regex)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show module information
    Modinfo {
        /// Module name or path
        module: String,
    },

    /// Load modules and everything they depend on
    Depmod {
        /// Module names
        #[arg(required = true)]
        modules: Vec<String>,
    },

    /// Load the modules listed in the boot list files
    Load {
        /// Path prefix of the list files
        #[arg(default_value = DEFAULT_LOAD_LIST_DIR)]
        prefix: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormatArg {
    Text,
    Csv,
    Json,
    Jsonl,
}

/// Rewrite the argument list of a multi-call invocation: when the binary is
/// run as `lsmod` (through a link), `lsmod -v` becomes `kmodloader lsmod -v`.
pub fn applet_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    let applet = args
        .first()
        .and_then(|argv0| Path::new(argv0).file_name())
        .and_then(|name| name.to_str())
        .and_then(|name| APPLETS.iter().find(|&&applet| applet == name))
        .copied();

    if let Some(applet) = applet {
        args.insert(1, OsString::from(applet));
    }
    args
}
