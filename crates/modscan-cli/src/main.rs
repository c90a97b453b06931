use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use modscan_core::report::render::{self, RenderMode};
use modscan_core::{InspectOptions, inspect};

mod args;

fn main() -> Result<()> {
    let args = args::Args::parse();

    init_logging(args.verbose);

    let options = InspectOptions {
        replace_policy: args.replace_overwrites.into(),
    };
    let report = inspect(&args.executable, &options)?;

    let mode = RenderMode::select(args.json, args.template, args.template_file)?;

    render::render(&mode, &report, io::stdout().lock())?;

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}
