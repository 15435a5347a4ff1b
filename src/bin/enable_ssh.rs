//! `enable-ssh`: enable the OpenSSH server when the configuration asks for it.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::EnableSshArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = EnableSshArgs::parse();
    commands::run_program("enable-ssh", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), args.dry_run);
        commands::enable_ssh::run(&ctx, &args)
    })
}
