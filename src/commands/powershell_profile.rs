//! `write-powershell-profile`: write the transcript-logging boilerplate
//! into a PowerShell profile.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};

use super::Context;
use crate::cli::{Edition, WritePowershellProfileArgs};
use crate::logging::StepStatus;
use crate::script::quote;
use crate::settings::json_file::backup_path;

const TEMPLATE: &str = r#"# This is a comment

Import-Module MyModule

# --- Begin MyModule Logging Block PS@MAJOR@ ---
# --- Build Timestamp Filename ---

$now = Get-Date
$timestamp = $now.ToString("yyyy-0MM-0dd 0HH.0mm.0ss.fffffff")
$iana_tz = Get-IanaTimeZone
$iso_week_date = Get-IsoWeekDate -date $now
$iso_ordinal_date = Get-IsoOrdinalDate -date $now

$log_name = "$timestamp $iana_tz $iso_week_date $iso_ordinal_date"
$safe_log_name = $log_name -replace '/', ' slash '

$log_directory = @LOG_DIRECTORY@
if (!(Test-Path $log_directory)) {
    New-Item -ItemType Directory -Path $log_directory | Out-Null
}

$log_file = Join-Path $log_directory "$safe_log_name.txt"

# --- Start Transcript ---
try {
    Start-Transcript -Path $log_file -Append -ErrorAction Stop
} catch {
    Write-Host "Transcript already running or failed to start."
}
# --- End MyModule Logging Block PS@PADDED@ ---

# Import the Chocolatey Profile that enables tab-completion for 'choco'.
# See https://ch0.co/tab-completion for details.
$ChocolateyProfile = "$env:ChocolateyInstall\helpers\chocolateyProfile.psm1"
if (Test-Path $ChocolateyProfile) {
    Import-Module "$ChocolateyProfile"
}
"#;

/// Executable that hosts `edition`.
#[must_use]
pub const fn shell(edition: Edition) -> &'static str {
    match edition {
        Edition::WindowsPowerShell => "powershell.exe",
        Edition::PowerShell7 => "pwsh",
    }
}

const fn display_name(edition: Edition) -> &'static str {
    match edition {
        Edition::WindowsPowerShell => "Windows PowerShell",
        Edition::PowerShell7 => "PowerShell 7",
    }
}

const fn major(edition: Edition) -> u8 {
    match edition {
        Edition::WindowsPowerShell => 5,
        Edition::PowerShell7 => 7,
    }
}

/// `C:\terminal-logs\powershell-005-logs` or `...-007-logs`.
#[must_use]
pub fn default_log_directory(edition: Edition) -> String {
    format!(r"C:\terminal-logs\powershell-{:03}-logs", major(edition))
}

/// Profile text for `edition`, sending transcripts to `log_directory`.
#[must_use]
pub fn profile_content(edition: Edition, log_directory: &str) -> String {
    let major = major(edition);
    TEMPLATE
        .replace("@MAJOR@", &major.to_string())
        .replace("@PADDED@", &format!("{major:03}"))
        .replace("@LOG_DIRECTORY@", &quote(log_directory))
}

/// Run `write-powershell-profile`.
///
/// Skips when the edition's shell is not on `PATH`. A profile with
/// different content is backed up before being replaced.
///
/// # Errors
///
/// Returns an error if `$PROFILE` cannot be resolved or the file cannot be
/// written.
pub fn run(ctx: &Context, args: &WritePowershellProfileArgs) -> Result<()> {
    let edition = args.edition;
    let shell = shell(edition);
    let name = display_name(edition);
    if !ctx.executor.which(shell) {
        ctx.log.info(&format!("{name} ({shell}) is not installed; skipping profile update"));
        ctx.log.record_step(name, StepStatus::Skipped, Some("shell not on PATH"));
        return Ok(());
    }

    let path = args
        .profile
        .clone()
        .map_or_else(|| query_profile_path(ctx, shell), Ok)?;
    ctx.log.stage(&format!("Writing {name} profile {}", path.display()));

    let log_directory = args.log_directory.as_ref().map_or_else(
        || default_log_directory(edition),
        |dir| dir.to_string_lossy().into_owned(),
    );
    let content = profile_content(edition, &log_directory);

    match fs::read_to_string(&path) {
        Ok(existing) if existing == content => {
            ctx.log.info(&format!("{} already up to date", path.display()));
            ctx.log.record_step(name, StepStatus::Skipped, Some("unchanged"));
            return Ok(());
        }
        Ok(existing) => {
            let copy = backup_path(&path);
            match fs::write(&copy, existing) {
                Ok(()) => ctx.log.debug(&format!("backup written to {}", copy.display())),
                Err(e) => ctx.log.warn(&format!("backup of {} failed: {e}", path.display())),
            }
        }
        Err(_) => {}
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ctx.ensure_dir(parent)?;
    }
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    ctx.log.success(&format!("{name} profile updated at {}", path.display()));
    ctx.log.record_step(name, StepStatus::Ok, None);
    Ok(())
}

/// Ask the shell for `$PROFILE`.
fn query_profile_path(ctx: &Context, shell: &str) -> Result<PathBuf> {
    let result = ctx
        .executor
        .run(shell, &["-NoProfile", "-Command", "Write-Output $PROFILE"])
        .with_context(|| format!("getting the profile path from {shell}"))?;
    let reported = result.stdout.trim();
    if reported.is_empty() {
        bail!("{shell} reported an empty $PROFILE");
    }
    Ok(PathBuf::from(reported))
}
