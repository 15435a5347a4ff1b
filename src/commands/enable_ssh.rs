//! `enable-ssh`: turn on the OpenSSH server when the profile asks for it.
use std::time::Instant;

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::EnableSshArgs;
use crate::config::profile;
use crate::logging::StepStatus;
use crate::script::PowerShellScript;

/// Run `enable-ssh`.
///
/// Anything other than `configuration_profile.ssh: on` (including a missing
/// key) skips the setup.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the script
/// fails.
pub fn run(ctx: &Context, args: &EnableSshArgs) -> Result<()> {
    let doc = ctx.load_document(&args.config)?;
    if !profile::ssh_enabled(&doc) {
        ctx.log.info("SSH is disabled in the configuration; skipping SSH setup");
        ctx.log.record_step("enable-ssh", StepStatus::Skipped, Some("ssh is not on"));
        return Ok(());
    }

    ctx.log.stage("Running Enable-SSH and Enable-SSHFirewallRule");
    let script = PowerShellScript::new()
        .import_module(&args.module)
        .call("Enable-SSH")
        .call("Enable-SSHFirewallRule");

    let started = Instant::now();
    ctx.runner
        .run("enable-ssh", &script)
        .context("SSH setup failed")?;
    ctx.log.success(&format!(
        "SSH setup completed in {:.2} seconds",
        started.elapsed().as_secs_f64()
    ));
    ctx.log.record_step(
        "enable-ssh",
        if ctx.dry_run {
            StepStatus::DryRun
        } else {
            StepStatus::Ok
        },
        None,
    );
    Ok(())
}
