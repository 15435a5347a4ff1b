//! `install-things`: install Chocolatey and every program listed in `install.yaml`.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::InstallThingsArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = InstallThingsArgs::parse();
    commands::run_program("install-things", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), args.dry_run);
        commands::install_things::run(&ctx, &args)
    })
}
