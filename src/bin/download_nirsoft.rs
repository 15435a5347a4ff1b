//! `download-nirsoft`: download the NirSoft bundle and unpack it.
use std::process::ExitCode;

use clap::Parser;
use workstation_cli::cli::DownloadNirsoftArgs;
use workstation_cli::commands::{self, Context, download_nirsoft};

fn main() -> ExitCode {
    let args = DownloadNirsoftArgs::parse();
    // The plan names the per-app log file, so it is resolved first.
    let plan = download_nirsoft::plan_from_file(&args.install);
    let log_file = plan.as_ref().ok().and_then(|p| p.log_file.clone());
    commands::run_program("download-nirsoft", &args.common, log_file, |log| {
        let plan = plan?;
        let ctx = Context::system(log.clone(), false);
        download_nirsoft::run(&ctx, &args, &plan)
    })
}
