//! `configure-vscode-keybindings`: add the terminal keybindings to VS Code.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::ConfigureVscodeKeybindingsArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = ConfigureVscodeKeybindingsArgs::parse();
    commands::run_program("configure-vscode-keybindings", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), false);
        commands::settings::configure_vscode_keybindings(&ctx, &args)
    })
}
