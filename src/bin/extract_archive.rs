//! `extract-archive`: unpack a zip archive, decrypting entries when a password is given.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::ExtractArchiveArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = ExtractArchiveArgs::parse();
    commands::run_program("extract-archive", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), false);
        commands::archive::extract(&ctx, &args)
    })
}
