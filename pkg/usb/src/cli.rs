//! Command line driver shared by the descriptor generator binaries.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use common::errors::*;
use tracing_subscriber::EnvFilter;

use crate::descriptor_table::DescriptorTableBuilder;

#[derive(Parser, Debug)]
#[command(
    about = "Generates the USB descriptor table of a device",
    disable_help_flag = true
)]
pub struct Args {
    /// The output header filename
    #[arg(short = 'h', long = "header")]
    pub header: PathBuf,

    /// The output filename
    pub output: PathBuf,

    /// Show this help message and exit
    #[arg(short = '?', long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

/// Entry point of a generator binary: parses the command line, builds the
/// device's descriptors with `gen_config` and writes the generated files.
pub fn run<F: FnOnce() -> Result<DescriptorTableBuilder>>(gen_config: F) -> Result<()> {
    init_logging()?;

    let args = Args::parse();
    generate(&args, gen_config)
}

pub fn generate<F: FnOnce() -> Result<DescriptorTableBuilder>>(args: &Args, gen_config: F) -> Result<()> {
    println!("Writing output to {}", args.output.display());

    let mut config = gen_config()?;
    config.write(&args.output, &args.header)
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format_err!("Failed to initialize logging: {}", e))
}
