//! `customize-explorer`: turn the Explorer and date/time toggles under
//! `configuration_profile` into one script of module function calls.
use anyhow::{Result, anyhow};

use super::Context;
use crate::cli::CustomizeExplorerArgs;
use crate::config::lookup::lookup_path;
use crate::config::profile::{self, PROFILE_KEY};
use crate::config::{Mapping, Value};
use crate::logging::StepStatus;
use crate::script::PowerShellScript;

/// A setting under `configuration_profile` and the function each accepted
/// value maps to.
#[derive(Debug, Clone, Copy)]
pub struct Toggle {
    /// Dotted path below `configuration_profile`.
    pub path: &'static str,
    /// `(lowercase value, function)` pairs.
    pub choices: &'static [(&'static str, &'static str)],
}

/// Every toggle, in the order their functions run.
pub const TOGGLES: &[Toggle] = &[
    Toggle {
        path: "explorer.dark_mode",
        choices: &[("true", "Set-DarkMode"), ("false", "Set-LightMode")],
    },
    Toggle {
        path: "explorer.search_box",
        choices: &[("hidden", "Set-HideSearchBox"), ("shown", "Set-ShowSearchBox")],
    },
    Toggle {
        path: "explorer.file_extensions",
        choices: &[
            ("hidden", "Set-HideFileExtensions"),
            ("shown", "Set-ShowFileExtensions"),
        ],
    },
    Toggle {
        path: "explorer.hidden_files",
        choices: &[("hidden", "Set-HideHiddenFiles"), ("shown", "Set-ShowHiddenFiles")],
    },
    Toggle {
        path: "explorer.start_menu_alignment",
        choices: &[("left", "Set-StartMenuToLeft"), ("center", "Set-StartMenuToCenter")],
    },
    Toggle {
        path: "date time settings.show seconds in taskbar",
        choices: &[
            ("on", "Set-ShowSecondsInTaskbar"),
            ("off", "Set-HideSecondsInTaskbar"),
        ],
    },
    Toggle {
        path: "date time settings.custom short date pattern",
        choices: &[
            ("on", "Set-CustomShortDatePattern"),
            ("off", "Reset-ShortDatePattern"),
        ],
    },
    Toggle {
        path: "date time settings.custom long date pattern",
        choices: &[
            ("on", "Set-CustomLongDatePattern"),
            ("off", "Reset-LongDatePattern"),
        ],
    },
    Toggle {
        path: "date time settings.custom time pattern",
        choices: &[
            ("on", "Set-CustomTimePattern"),
            ("off", "Reset-TimePatternToDefault"),
        ],
    },
    Toggle {
        path: "date time settings.24 hour time format",
        choices: &[("on", "Set-24HourTimeFormat"), ("off", "Reset-12HourTimeFormat")],
    },
    Toggle {
        path: "date time settings.set first day of the week to monday",
        choices: &[
            ("on", "Set-FirstDayOfWeekMonday"),
            ("off", "Set-FirstDayOfWeekSunday"),
        ],
    },
];

/// What the configuration says about one [`Toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The value maps to `function`.
    Matched {
        /// Toggle path.
        path: &'static str,
        /// Configured value as written.
        value: String,
        /// Module function to call.
        function: &'static str,
    },
    /// The key is set to something the toggle does not accept.
    Unknown {
        /// Toggle path.
        path: &'static str,
        /// Configured value as written.
        value: String,
    },
    /// The key is absent (or not a scalar).
    Missing {
        /// Toggle path.
        path: &'static str,
    },
}

/// Resolve every toggle against the `configuration_profile` mapping.
///
/// Values are trimmed and compared case-insensitively; YAML booleans count
/// as `true`/`false`.
#[must_use]
pub fn translate(section: &Mapping) -> Vec<Resolution> {
    TOGGLES
        .iter()
        .map(|toggle| {
            let Some(value) = lookup_path(section, toggle.path).and_then(Value::scalar_text) else {
                return Resolution::Missing { path: toggle.path };
            };
            let wanted = value.trim().to_lowercase();
            match toggle.choices.iter().find(|(choice, _)| *choice == wanted) {
                Some(&(_, function)) => Resolution::Matched {
                    path: toggle.path,
                    value,
                    function,
                },
                None => Resolution::Unknown {
                    path: toggle.path,
                    value,
                },
            }
        })
        .collect()
}

/// Run `customize-explorer`.
///
/// A missing or unknown toggle is a warning. When nothing matches, no
/// script runs.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, has no
/// `configuration_profile` section, or the script fails.
pub fn run(ctx: &Context, args: &CustomizeExplorerArgs) -> Result<()> {
    ctx.log.stage(&format!("Reading {}", args.config.display()));
    let doc = ctx.load_document(&args.config)?;
    let section = profile::section(&doc)
        .ok_or_else(|| anyhow!("'{PROFILE_KEY}' not found or not a mapping"))?;

    ctx.log.stage("Translating configuration to PowerShell functions");
    let mut script = PowerShellScript::new().import_module(&args.module);
    for resolution in translate(section) {
        match resolution {
            Resolution::Matched {
                path,
                value,
                function,
            } => {
                ctx.log.info(&format!("{path} = {value} → {function}"));
                script = script.call(function);
            }
            Resolution::Unknown { path, value } => {
                ctx.log.warn(&format!("unknown value: {path} = {value}"));
                ctx.log.record_step(path, StepStatus::Skipped, Some("unknown value"));
            }
            Resolution::Missing { path } => {
                ctx.log.warn(&format!("key not found: {path}"));
                ctx.log.record_step(path, StepStatus::Skipped, Some("not set"));
            }
        }
    }

    if script.is_empty() {
        ctx.log.warn("no PowerShell functions matched; nothing to do");
        return Ok(());
    }

    ctx.log.stage("Running PowerShell script");
    ctx.runner.run("customize-explorer", &script)?;
    ctx.log.success("Explorer settings applied");
    ctx.log.record_step(
        "customize-explorer",
        if ctx.dry_run {
            StepStatus::DryRun
        } else {
            StepStatus::Ok
        },
        None,
    );
    Ok(())
}
