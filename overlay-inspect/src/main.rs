//! CLI entrypoint for `overlay-inspect`.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use overlay_inspect::cli::Args;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let mut stdout = io::stdout().lock();
    match overlay_inspect::run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _unused = writeln!(io::stderr().lock(), "overlay-inspect: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
