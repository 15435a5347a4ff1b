//! `install-powershell-module`: copy a PowerShell module into the modules directory.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::InstallPowershellModuleArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = InstallPowershellModuleArgs::parse();
    commands::run_program("install-powershell-module", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), args.dry_run);
        commands::powershell_module::run(&ctx, &args)
    })
}
