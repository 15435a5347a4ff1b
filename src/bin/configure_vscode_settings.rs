//! `configure-vscode-settings`: apply the fixed VS Code user settings.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::ConfigureVscodeSettingsArgs;
use workstation_cli::commands::{self, Context};

fn main() -> ExitCode {
    let args = ConfigureVscodeSettingsArgs::parse();
    commands::run_program("configure-vscode-settings", &args.common, None, |log| {
        let ctx = Context::system(log.clone(), false);
        commands::settings::configure_vscode_settings(&ctx, &args)
    })
}
