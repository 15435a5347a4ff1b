//! `configure-windows-terminal`: set the Windows Terminal profiles and defaults.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::ConfigureWindowsTerminalArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = ConfigureWindowsTerminalArgs::parse();
    commands::run_program("configure-windows-terminal", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), false);
        commands::settings::configure_windows_terminal(&ctx, &args)
    })
}
