//! `customize-explorer`: apply the Explorer and date/time toggles.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::CustomizeExplorerArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = CustomizeExplorerArgs::parse();
    commands::run_program("customize-explorer", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), args.dry_run);
        commands::explorer::run(&ctx, &args)
    })
}
