//! `install-vscode-extensions`: install the configured VS Code extensions.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::InstallVscodeExtensionsArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = InstallVscodeExtensionsArgs::parse();
    commands::run_program("install-vscode-extensions", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), args.dry_run);
        commands::vscode_extensions::run(&ctx, &args)
    })
}
