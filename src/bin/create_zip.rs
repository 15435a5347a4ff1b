//! `create-zip`: pack a folder into a zip archive.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::CreateZipArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = CreateZipArgs::parse();
    commands::run_program("create-zip", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), false);
        commands::archive::create_zip(&ctx, &args)
    })
}
