//! `configure-vscode-settings`, `configure-vscode-keybindings` and
//! `configure-windows-terminal`.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::{
    ConfigureVscodeKeybindingsArgs, ConfigureVscodeSettingsArgs, ConfigureWindowsTerminalArgs,
};
use crate::error::PlatformError;
use crate::logging::StepStatus;
use crate::settings::{EditOutcome, WhenMissing, edit, keybindings, terminal, vscode};

/// Apply the fixed VS Code user settings.
///
/// # Errors
///
/// Returns an error if the settings path or desktop cannot be resolved, or
/// the edit fails.
pub fn configure_vscode_settings(ctx: &Context, args: &ConfigureVscodeSettingsArgs) -> Result<()> {
    let path = target(args.settings.as_ref(), || ctx.dirs.vscode_settings())?;
    let desktop = ctx.dirs.desktop()?.to_string_lossy().into_owned();
    ctx.log.stage(&format!("Configuring VS Code settings {}", path.display()));

    let outcome = edit(&path, WhenMissing::EmptyObject, ctx.log.as_ref(), |doc| {
        vscode::apply(doc, &desktop)
    })
    .with_context(|| format!("updating {}", path.display()))?;
    report(ctx, "VS Code settings", &path, &outcome);
    Ok(())
}

/// Append the terminal keybindings that are not already bound.
///
/// # Errors
///
/// Returns an error if the keybindings path cannot be resolved or the edit
/// fails.
pub fn configure_vscode_keybindings(
    ctx: &Context,
    args: &ConfigureVscodeKeybindingsArgs,
) -> Result<()> {
    let path = target(args.settings.as_ref(), || ctx.dirs.vscode_keybindings())?;
    ctx.log.stage(&format!("Configuring VS Code keybindings {}", path.display()));

    let mut added = 0;
    let outcome = edit(&path, WhenMissing::EmptyArray, ctx.log.as_ref(), |doc| {
        added = keybindings::apply(doc)?;
        Ok(())
    })
    .with_context(|| format!("updating {}", path.display()))?;
    ctx.log.info(&format!("{added} keybindings added"));
    report(ctx, "VS Code keybindings", &path, &outcome);
    Ok(())
}

/// Set the Windows Terminal default profile, profile defaults and profile
/// list.
///
/// # Errors
///
/// Returns an error if the settings file is missing or malformed.
pub fn configure_windows_terminal(
    ctx: &Context,
    args: &ConfigureWindowsTerminalArgs,
) -> Result<()> {
    let path = target(args.settings.as_ref(), || ctx.dirs.windows_terminal_settings())?;
    ctx.log.stage(&format!("Configuring Windows Terminal {}", path.display()));

    let outcome = edit(&path, WhenMissing::Fail, ctx.log.as_ref(), terminal::apply)
        .with_context(|| format!("updating {}", path.display()))?;
    report(ctx, "Windows Terminal", &path, &outcome);
    Ok(())
}

/// `--settings` if given, else the well-known location.
fn target<F>(explicit: Option<&PathBuf>, default: F) -> Result<PathBuf, PlatformError>
where
    F: FnOnce() -> Result<PathBuf, PlatformError>,
{
    explicit.map_or_else(default, |path| Ok(path.clone()))
}

fn report(ctx: &Context, name: &str, path: &Path, outcome: &EditOutcome) {
    match outcome {
        EditOutcome::Written { backup } => {
            if let Some(copy) = backup {
                ctx.log.info(&format!("backup saved at {}", copy.display()));
            }
            ctx.log.success(&format!("{name} updated at {}", path.display()));
            ctx.log.record_step(name, StepStatus::Ok, None);
        }
        EditOutcome::Unchanged => {
            ctx.log.info(&format!("{name} already up to date"));
            ctx.log.record_step(name, StepStatus::Skipped, Some("unchanged"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cli::CommonOpts;
    use crate::commands::test_helpers::Harness;
    use serde_json::Value;
    use std::fs;

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn vscode_settings_default_to_user_dir_and_desktop() {
        let h = Harness::new();
        let args = ConfigureVscodeSettingsArgs {
            settings: None,
            common: CommonOpts::default(),
        };
        configure_vscode_settings(&h.context(false), &args).unwrap();

        let path = h.path("Roaming/Code/User/settings.json");
        let doc = read_json(&path);
        let desktop = h.path("User").join("Desktop");
        assert_eq!(
            doc["terminal.integrated.cwd"],
            Value::String(desktop.to_string_lossy().into_owned())
        );
        assert_eq!(h.log.step_entries()[0].status, StepStatus::Ok);
    }

    #[test]
    fn vscode_settings_second_run_is_unchanged() {
        let h = Harness::new();
        let path = h.write("settings.json", "{\"editor.fontSize\": 13}\n");
        let args = ConfigureVscodeSettingsArgs {
            settings: Some(path.clone()),
            common: CommonOpts::default(),
        };
        configure_vscode_settings(&h.context(false), &args).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        configure_vscode_settings(&h.context(false), &args).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), first);
        assert_eq!(read_json(&path)["editor.fontSize"], Value::from(13));
        let statuses: Vec<_> = h.log.step_entries().iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec![StepStatus::Ok, StepStatus::Skipped]);
        assert!(h.log_text().contains("backup saved at"));
    }

    #[test]
    fn keybindings_are_added_once() {
        let h = Harness::new();
        let path = h.path("kb/keybindings.json");
        let args = ConfigureVscodeKeybindingsArgs {
            settings: Some(path.clone()),
            common: CommonOpts::default(),
        };
        configure_vscode_keybindings(&h.context(false), &args).unwrap();
        let count = read_json(&path).as_array().unwrap().len();
        assert_eq!(count, keybindings::TERMINAL_BINDINGS.len());

        configure_vscode_keybindings(&h.context(false), &args).unwrap();
        assert_eq!(read_json(&path).as_array().unwrap().len(), count);
        assert!(h.log_text().contains("0 keybindings added"));
    }

    #[test]
    fn terminal_requires_existing_file() {
        let h = Harness::new();
        let args = ConfigureWindowsTerminalArgs {
            settings: Some(h.path("absent.json")),
            common: CommonOpts::default(),
        };
        assert!(configure_windows_terminal(&h.context(false), &args).is_err());
        assert!(!h.path("absent.json").exists());
    }

    #[test]
    fn terminal_default_path_is_under_local_app_data() {
        let h = Harness::new();
        let path = h.write(
            "Local/Packages/Microsoft.WindowsTerminal_8wekyb3d8bbwe/LocalState/settings.json",
            "{\"profiles\": {\"list\": []}}",
        );
        let args = ConfigureWindowsTerminalArgs {
            settings: None,
            common: CommonOpts::default(),
        };
        configure_windows_terminal(&h.context(false), &args).unwrap();
        assert_eq!(
            read_json(&path)["defaultProfile"],
            Value::String(terminal::POWERSHELL_7_GUID.to_string())
        );
    }

    #[test]
    fn missing_user_dirs_are_reported() {
        let mut h = Harness::new();
        h.dirs.app_data = None;
        let args = ConfigureVscodeKeybindingsArgs {
            settings: None,
            common: CommonOpts::default(),
        };
        let err = configure_vscode_keybindings(&h.context(false), &args).unwrap_err();
        assert!(err.to_string().contains("APPDATA"));
    }
}
