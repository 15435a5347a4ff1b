//! Command-line arguments, one [`Parser`] per program.
//!
//! Every program is a single fixed pipeline; none of them has subcommands.
use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::installers::NIRSOFT;

/// Options shared by every program.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonOpts {
    /// Show debug output on the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Append the run log to this file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

/// Extract a zip archive, refusing entries that would land outside the
/// destination.
#[derive(Parser, Debug, Clone)]
#[command(name = "extract-archive", version = crate::VERSION)]
pub struct ExtractArchiveArgs {
    /// Archive to extract
    #[arg(long, value_name = "ZIP")]
    pub archive: PathBuf,

    /// Destination directory (created if absent)
    #[arg(long, value_name = "DIR")]
    pub dest: PathBuf,

    /// Password for encrypted entries
    #[arg(long, env = "ARCHIVE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Pack a directory into a zip archive, optionally AES-256 encrypted.
#[derive(Parser, Debug, Clone)]
#[command(name = "create-zip", version = crate::VERSION)]
pub struct CreateZipArgs {
    /// Directory to archive
    #[arg(long, value_name = "DIR")]
    pub source: PathBuf,

    /// Archive to write
    #[arg(long, value_name = "ZIP")]
    pub output: PathBuf,

    /// Encrypt every entry with this password
    #[arg(long, env = "ARCHIVE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Extract the new archive into a timestamped folder beside it
    #[arg(long)]
    pub verify: bool,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Download the NirSoft bundle into a timestamped folder and extract it.
#[derive(Parser, Debug, Clone)]
#[command(name = "download-nirsoft", version = crate::VERSION)]
pub struct DownloadNirsoftArgs {
    /// Install manifest (install.yaml)
    #[arg(long, value_name = "YAML")]
    pub install: PathBuf,

    /// Bundle URL
    #[arg(long, default_value = NIRSOFT.url)]
    pub url: String,

    /// Password of the encrypted bundle
    #[arg(long, env = "NIRSOFT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Expected SHA-256 of the download (hex)
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Install every program listed in the install manifest.
#[derive(Parser, Debug, Clone)]
#[command(name = "install-things", version = crate::VERSION)]
pub struct InstallThingsArgs {
    /// Install manifest (install.yaml)
    #[arg(long, value_name = "YAML")]
    pub install: PathBuf,

    /// Provisioning PowerShell module (.psm1)
    #[arg(long, value_name = "PSM1")]
    pub module: PathBuf,

    /// Password of the encrypted NirSoft bundle
    #[arg(long, env = "NIRSOFT_PASSWORD", hide_env_values = true)]
    pub nirsoft_password: Option<String>,

    /// Log the scripts and downloads instead of running them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Apply the Explorer and date/time toggles from the configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "customize-explorer", version = crate::VERSION)]
pub struct CustomizeExplorerArgs {
    /// Configuration document (config.yaml)
    #[arg(long, visible_alias = "yaml", value_name = "YAML")]
    pub config: PathBuf,

    /// Provisioning PowerShell module (.psm1)
    #[arg(long, value_name = "PSM1")]
    pub module: PathBuf,

    /// Log the generated script instead of running it
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Enable the OpenSSH server when the configuration asks for it.
#[derive(Parser, Debug, Clone)]
#[command(name = "enable-ssh", version = crate::VERSION)]
pub struct EnableSshArgs {
    /// Configuration document (config.yaml)
    #[arg(long, visible_alias = "yaml", value_name = "YAML")]
    pub config: PathBuf,

    /// Provisioning PowerShell module (.psm1)
    #[arg(long, value_name = "PSM1")]
    pub module: PathBuf,

    /// Log the generated script instead of running it
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Install the VS Code extensions listed in the configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "install-vscode-extensions", version = crate::VERSION)]
pub struct InstallVscodeExtensionsArgs {
    /// Configuration document (config.yaml)
    #[arg(long, visible_alias = "yaml", value_name = "YAML")]
    pub config: PathBuf,

    /// Log the `code` invocations instead of running them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Copy a PowerShell module into the configured modules directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "install-powershell-module", version = crate::VERSION)]
pub struct InstallPowershellModuleArgs {
    /// Configuration document (config.yaml)
    #[arg(long, visible_alias = "yaml", value_name = "YAML")]
    pub config: PathBuf,

    /// Module script (.psm1)
    #[arg(long, value_name = "PSM1")]
    pub psm1: PathBuf,

    /// Module manifest (.psd1)
    #[arg(long, value_name = "PSD1")]
    pub psd1: PathBuf,

    /// Module name; defaults to the .psm1 file stem
    #[arg(long)]
    pub name: Option<String>,

    /// Log the copies instead of making them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Merge the standard editor settings into VS Code's `settings.json`.
#[derive(Parser, Debug, Clone)]
#[command(name = "configure-vscode-settings", version = crate::VERSION)]
pub struct ConfigureVscodeSettingsArgs {
    /// Settings file to edit instead of the per-user default
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Add the terminal keybindings to VS Code's `keybindings.json`.
#[derive(Parser, Debug, Clone)]
#[command(name = "configure-vscode-keybindings", version = crate::VERSION)]
pub struct ConfigureVscodeKeybindingsArgs {
    /// Keybindings file to edit instead of the per-user default
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Normalise the Windows Terminal profile list and defaults.
#[derive(Parser, Debug, Clone)]
#[command(name = "configure-windows-terminal", version = crate::VERSION)]
pub struct ConfigureWindowsTerminalArgs {
    /// Settings file to edit instead of the Store install's
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// PowerShell edition whose profile is written.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edition {
    /// Windows PowerShell 5.1 (`powershell.exe`).
    #[value(name = "5")]
    WindowsPowerShell,
    /// PowerShell 7 (`pwsh`).
    #[value(name = "7")]
    PowerShell7,
}

/// Write the transcript-logging boilerplate into a PowerShell profile.
#[derive(Parser, Debug, Clone)]
#[command(name = "write-powershell-profile", version = crate::VERSION)]
pub struct WritePowershellProfileArgs {
    /// Edition whose profile to write
    #[arg(long, value_enum)]
    pub edition: Edition,

    /// Profile path; defaults to `$PROFILE` as reported by the shell
    #[arg(long, value_name = "PS1")]
    pub profile: Option<PathBuf>,

    /// Transcript directory; defaults to `C:\terminal-logs\powershell-00<N>-logs`
    #[arg(long, value_name = "DIR")]
    pub log_directory: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonOpts,
}

/// Print a filesystem-safe timestamp segment.
#[derive(Parser, Debug, Clone)]
#[command(name = "timestamp", version = crate::VERSION)]
pub struct TimestampArgs;
