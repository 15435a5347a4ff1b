//! Accessors for the `configuration_profile` section and the VS Code
//! extension list.
use std::path::PathBuf;

use super::lookup::{lookup_list, lookup_map, lookup_string};
use super::value::{Mapping, Value};
use crate::error::ConfigError;

/// Root key of the per-machine toggles.
pub const PROFILE_KEY: &str = "configuration_profile";

/// Return the `configuration_profile` mapping, if present.
#[must_use]
pub fn section(doc: &Value) -> Option<&Mapping> {
    lookup_map(doc, PROFILE_KEY)
}

/// Whether `configuration_profile.ssh` is `on` (trimmed, any case).
///
/// A missing section or key counts as off.
#[must_use]
pub fn ssh_enabled(doc: &Value) -> bool {
    lookup_string(&section(doc), "ssh").is_some_and(|v| v.trim().eq_ignore_ascii_case("on"))
}

/// Directory that holds user PowerShell modules
/// (`configuration_profile.powershell modules`).
///
/// # Errors
///
/// Returns [`ConfigError::MissingKey`] when the section or key is absent or
/// blank.
pub fn powershell_modules_dir(doc: &Value) -> Result<PathBuf, ConfigError> {
    let profile = section(doc).ok_or_else(|| ConfigError::MissingKey(PROFILE_KEY.into()))?;
    lookup_string(profile, "powershell modules")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ConfigError::MissingKey("powershell modules".into()))
}

/// Extension identifiers listed under `vs_code_extensions`, in order.
///
/// Blank entries are dropped; a missing key yields an empty list.
#[must_use]
pub fn vscode_extensions(doc: &Value) -> Vec<String> {
    lookup_list(doc, "vs_code_extensions")
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
