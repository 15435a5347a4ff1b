//! `install-powershell-module`: copy a module's `.psm1`/`.psd1` pair into
//! the configured PowerShell modules directory.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};

use super::Context;
use crate::cli::InstallPowershellModuleArgs;
use crate::config::profile;
use crate::logging::StepStatus;

/// Module name: `--name`, else the stem of the `.psm1` file.
///
/// # Errors
///
/// Returns an error if no name is given and the `.psm1` path has no stem.
pub fn module_name(args: &InstallPowershellModuleArgs) -> Result<String> {
    if let Some(name) = args.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }
    args.psm1
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("cannot derive a module name from {}", args.psm1.display()))
}

/// Where the module's two files end up: `<dir>/<name>/<name>.psm1` and
/// `.psd1`.
#[must_use]
pub fn targets(modules_dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    let folder = modules_dir.join(name);
    (
        folder.join(format!("{name}.psm1")),
        folder.join(format!("{name}.psd1")),
    )
}

/// Run `install-powershell-module`.
///
/// # Errors
///
/// Returns an error if the configuration lacks
/// `configuration_profile.powershell modules`, a source file is missing, or
/// a copy fails.
pub fn run(ctx: &Context, args: &InstallPowershellModuleArgs) -> Result<()> {
    let doc = ctx.load_document(&args.config)?;
    let modules_dir = profile::powershell_modules_dir(&doc)?;
    let name = module_name(args)?;
    let (psm1, psd1) = targets(&modules_dir, &name);

    ctx.log.stage(&format!("Installing module '{name}' into {}", modules_dir.display()));
    for source in [&args.psm1, &args.psd1] {
        if !source.is_file() {
            return Err(anyhow!("module file not found: {}", source.display()));
        }
    }

    if let Some(folder) = psm1.parent() {
        ctx.ensure_dir(folder)?;
    }
    for (source, target) in [(&args.psm1, &psm1), (&args.psd1, &psd1)] {
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would copy {} to {}",
                source.display(),
                target.display()
            ));
            continue;
        }
        fs::copy(source, target).with_context(|| {
            format!("copying {} to {}", source.display(), target.display())
        })?;
        ctx.log.debug(&format!("copied {}", target.display()));
    }

    let status = if ctx.dry_run {
        StepStatus::DryRun
    } else {
        ctx.log.success(&format!(
            "module '{name}' installed to {}",
            modules_dir.join(&name).display()
        ));
        StepStatus::Ok
    };
    ctx.log.record_step(&name, status, None);
    Ok(())
}
