//! Main entry point for the kernel module loader
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use kmodloader::cli::args::{applet_args, Cli, LoaderCommand, OutputFormatArg};
use kmodloader::commands::command_trait::{CommandContext, CommandOutput, ModuleCommand};
use kmodloader::commands::{
    DepmodCommand, InsmodCommand, LoadCommand, LsmodCommand, ModinfoCommand, RmmodCommand,
};
use kmodloader::config::{kernel_release, Config, DEFAULT_LOAD_LIST_DIR};
use kmodloader::formats::traits::{OutputDestination, OutputFormat, OutputWriter};
use kmodloader::kernel::SyscallKernel;

fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Build the command object for the parsed arguments
fn build_command(command: Option<LoaderCommand>) -> Box<dyn ModuleCommand> {
    match command {
        Some(LoaderCommand::Insmod { module, params }) => Box::new(InsmodCommand { module, params }),
        Some(LoaderCommand::Rmmod { module, force }) => Box::new(RmmodCommand { module, force }),
        Some(LoaderCommand::Lsmod { name }) => Box::new(LsmodCommand { name }),
        Some(LoaderCommand::Modinfo { module }) => Box::new(ModinfoCommand { module }),
        Some(LoaderCommand::Depmod { modules }) => Box::new(DepmodCommand { modules }),
        Some(LoaderCommand::Load { prefix }) => Box::new(LoadCommand { prefix }),
        None => Box::new(LoadCommand {
            prefix: DEFAULT_LOAD_LIST_DIR.to_string(),
        }),
    }
}

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse_from(applet_args(std::env::args_os()));
    init_logging(&cli);

    let release = match cli.release.clone() {
        Some(release) => release,
        None => kernel_release().context("failed to read the kernel release")?,
    };
    let config = Config::new(cli.proc_modules.clone(), cli.module_root.clone(), release);

    // Determine output format and destination
    let output_format = match cli.format {
        OutputFormatArg::Text => OutputFormat::Text,
        OutputFormatArg::Csv => OutputFormat::Csv,
        OutputFormatArg::Json => OutputFormat::Json,
        OutputFormatArg::Jsonl => OutputFormat::Jsonl,
    };
    let output_dest = match &cli.output {
        Some(path) => OutputDestination::File(path.clone()),
        None => OutputDestination::Stdout,
    };
    let output_writer = OutputWriter::new(output_format, output_dest);

    let kernel = SyscallKernel;
    let context = CommandContext {
        config: &config,
        kernel: &kernel,
    };

    let command = build_command(cli.command);
    let output = command
        .run(&context)
        .with_context(|| format!("{} failed", command.name()))?;

    match output {
        CommandOutput::Modules(modules) => output_writer.write_modules(&modules)?,
        CommandOutput::ModInfo(info) => output_writer.write_modinfo(&info)?,
        CommandOutput::Resolution(report) => {
            output_writer.write_resolution(&report)?;
            if report.unresolved_count() > 0 {
                log::warn!("{} modules could not be resolved", report.unresolved_count());
            }
        }
        CommandOutput::Load(report) => output_writer.write_load(&report)?,
        CommandOutput::Done => {}
    }

    Ok(())
}
