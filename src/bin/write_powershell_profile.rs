//! `write-powershell-profile`: write the transcript-logging PowerShell profile.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::WritePowershellProfileArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = WritePowershellProfileArgs::parse();
    commands::run_program("write-powershell-profile", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), false);
        commands::powershell_profile::run(&ctx, &args)
    })
}
