//! Well-known per-user Windows directories.
//!
//! The paths are derived from `APPDATA`, `LOCALAPPDATA` and `USERPROFILE`.
//! [`UserDirs::from_env`] reads them once; tests build a [`UserDirs`] by hand.
use std::path::PathBuf;

use crate::error::PlatformError;

/// Package family of the Store build of Windows Terminal.
const WINDOWS_TERMINAL_PACKAGE: &str = "Microsoft.WindowsTerminal_8wekyb3d8bbwe";

/// Snapshot of the per-user base directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirs {
    /// `%APPDATA%` (roaming).
    pub app_data: Option<PathBuf>,
    /// `%LOCALAPPDATA%`.
    pub local_app_data: Option<PathBuf>,
    /// `%USERPROFILE%`.
    pub user_profile: Option<PathBuf>,
}

impl UserDirs {
    /// Read the base directories from the environment. Empty values count
    /// as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            app_data: var("APPDATA"),
            local_app_data: var("LOCALAPPDATA"),
            user_profile: var("USERPROFILE"),
        }
    }

    /// `%APPDATA%\Code\User`, the VS Code user settings directory.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingEnv`] if `APPDATA` is unset.
    pub fn vscode_user_dir(&self) -> Result<PathBuf, PlatformError> {
        Ok(self
            .app_data
            .as_ref()
            .ok_or(PlatformError::MissingEnv("APPDATA"))?
            .join("Code")
            .join("User"))
    }

    /// Path of the VS Code `settings.json`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingEnv`] if `APPDATA` is unset.
    pub fn vscode_settings(&self) -> Result<PathBuf, PlatformError> {
        Ok(self.vscode_user_dir()?.join("settings.json"))
    }

    /// Path of the VS Code `keybindings.json`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingEnv`] if `APPDATA` is unset.
    pub fn vscode_keybindings(&self) -> Result<PathBuf, PlatformError> {
        Ok(self.vscode_user_dir()?.join("keybindings.json"))
    }

    /// Path of the Windows Terminal `settings.json`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingEnv`] if `LOCALAPPDATA` is unset.
    pub fn windows_terminal_settings(&self) -> Result<PathBuf, PlatformError> {
        Ok(self
            .local_app_data
            .as_ref()
            .ok_or(PlatformError::MissingEnv("LOCALAPPDATA"))?
            .join("Packages")
            .join(WINDOWS_TERMINAL_PACKAGE)
            .join("LocalState")
            .join("settings.json"))
    }

    /// The user's desktop folder.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingEnv`] if `USERPROFILE` is unset.
    pub fn desktop(&self) -> Result<PathBuf, PlatformError> {
        Ok(self
            .user_profile
            .as_ref()
            .ok_or(PlatformError::MissingEnv("USERPROFILE"))?
            .join("Desktop"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn dirs() -> UserDirs {
        UserDirs {
            app_data: Some(PathBuf::from("roaming")),
            local_app_data: Some(PathBuf::from("local")),
            user_profile: Some(PathBuf::from("home")),
        }
    }

    #[test]
    fn vscode_paths_live_under_appdata() {
        let d = dirs();
        assert_eq!(
            d.vscode_settings().unwrap(),
            PathBuf::from("roaming").join("Code").join("User").join("settings.json")
        );
        assert!(d.vscode_keybindings().unwrap().ends_with("keybindings.json"));
    }

    #[test]
    fn windows_terminal_path_uses_package_family() {
        let p = dirs().windows_terminal_settings().unwrap();
        assert!(p.starts_with("local"));
        assert!(p.components().any(|c| c.as_os_str() == WINDOWS_TERMINAL_PACKAGE));
        assert!(p.ends_with(PathBuf::from("LocalState").join("settings.json")));
    }

    #[test]
    fn desktop_is_under_user_profile() {
        assert_eq!(dirs().desktop().unwrap(), PathBuf::from("home").join("Desktop"));
    }

    #[test]
    fn missing_variables_are_reported_by_name() {
        let empty = UserDirs::default();
        assert_eq!(
            empty.vscode_settings().unwrap_err().to_string(),
            "Environment variable APPDATA is not set"
        );
        assert!(
            empty
                .windows_terminal_settings()
                .unwrap_err()
                .to_string()
                .contains("LOCALAPPDATA")
        );
        assert!(empty.desktop().is_err());
    }
}
