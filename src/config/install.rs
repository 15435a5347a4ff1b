//! Views over an install manifest (`install.yaml`).
//!
//! Two programs read the same keys with different fallback rules, so each
//! policy gets its own constructor:
//!
//! - [`InstallLayout::resolve`] is used by `install-things`. The global log
//!   and download directories are required and may be nested one mapping
//!   deeper than expected.
//! - [`AppDirs::resolve_strict`] is used by `download-nirsoft`. Only plain
//!   strings are accepted, and a missing log directory only disables the
//!   per-app log file.
//!
//! Expected document shape:
//!
//! ```yaml
//! install:
//!   programs to install: [Go, Nirsoft, SQL Developer]
//!   logs:
//!     global log directory: C:\logs
//!     per app log directories: { nirsoft: nirsoft }
//!   downloads:
//!     global download directory: C:\downloads
//!     per app download directories: { nirsoft: nirsoft }
//! ```

use std::path::{Path, PathBuf};

use super::lookup::{lookup_list, lookup_map, lookup_string, lookup_string_or_first_nested};
use super::value::{Mapping, Value};
use crate::error::ConfigError;

const GLOBAL_LOG_DIR: &str = "global log directory";
const GLOBAL_DOWNLOAD_DIR: &str = "global download directory";
const PER_APP_LOGS: &str = "per app log directories";
const PER_APP_DOWNLOADS: &str = "per app download directories";

/// Resolved `install` section as consumed by `install-things`.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    /// Program labels in manifest order.
    pub programs: Vec<String>,
    /// Root of all per-app log directories.
    pub global_log_dir: PathBuf,
    /// Root of all per-app download directories.
    pub global_download_dir: PathBuf,
    per_app_logs: Mapping,
    per_app_downloads: Mapping,
}

impl InstallLayout {
    /// Resolve the layout from a parsed manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if the `install` section, the
    /// global log directory, or the global download directory is absent or
    /// blank.
    pub fn resolve(doc: &Value) -> Result<Self, ConfigError> {
        let install =
            lookup_map(doc, "install").ok_or_else(|| ConfigError::MissingKey("install".into()))?;
        let logs = lookup_map(install, "logs");
        let downloads = lookup_map(install, "downloads");

        let global_log_dir = required_dir(lookup_string_or_first_nested(&logs, GLOBAL_LOG_DIR))
            .ok_or_else(|| ConfigError::MissingKey(GLOBAL_LOG_DIR.into()))?;
        let global_download_dir =
            required_dir(lookup_string_or_first_nested(&downloads, GLOBAL_DOWNLOAD_DIR))
                .ok_or_else(|| ConfigError::MissingKey(GLOBAL_DOWNLOAD_DIR.into()))?;

        Ok(Self {
            programs: lookup_list(install, "programs to install").unwrap_or_default(),
            global_log_dir,
            global_download_dir,
            per_app_logs: lookup_map(&logs, PER_APP_LOGS).cloned().unwrap_or_default(),
            per_app_downloads: lookup_map(&downloads, PER_APP_DOWNLOADS)
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Per-app log subdirectory name for `app`, if configured.
    #[must_use]
    pub fn app_log_subdir(&self, app: &str) -> Option<&str> {
        non_blank(lookup_string(&self.per_app_logs, app))
    }

    /// Log directory for `app`: the global directory joined with the per-app
    /// subdirectory, or the global directory alone when none is configured.
    #[must_use]
    pub fn app_log_dir(&self, app: &str) -> PathBuf {
        join_optional(&self.global_log_dir, self.app_log_subdir(app))
    }

    /// Download directory for `app`, resolved like [`Self::app_log_dir`].
    #[must_use]
    pub fn app_download_dir(&self, app: &str) -> PathBuf {
        join_optional(
            &self.global_download_dir,
            non_blank(lookup_string(&self.per_app_downloads, app)),
        )
    }
}

/// Per-app directories as resolved by `download-nirsoft`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// Download directory (global joined with the per-app subdirectory).
    pub download_dir: PathBuf,
    /// Log directory; `None` when either the global or per-app entry is missing.
    pub log_dir: Option<PathBuf>,
}

impl AppDirs {
    /// Resolve download and log directories for `app` using plain string
    /// lookups only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if the `install` section or the
    /// global download directory is absent.
    pub fn resolve_strict(doc: &Value, app: &str) -> Result<Self, ConfigError> {
        let install =
            lookup_map(doc, "install").ok_or_else(|| ConfigError::MissingKey("install".into()))?;
        let logs = lookup_map(install, "logs");
        let downloads = lookup_map(install, "downloads");

        let global_download = non_blank(lookup_string(&downloads, GLOBAL_DOWNLOAD_DIR))
            .ok_or_else(|| ConfigError::MissingKey(GLOBAL_DOWNLOAD_DIR.into()))?;
        let per_app_downloads = lookup_map(&downloads, PER_APP_DOWNLOADS);
        let sub_download = non_blank(lookup_string(&per_app_downloads, app));

        let per_app_logs = lookup_map(&logs, PER_APP_LOGS);
        let global_log = non_blank(lookup_string(&logs, GLOBAL_LOG_DIR));
        let sub_log = non_blank(lookup_string(&per_app_logs, app));

        Ok(Self {
            download_dir: join_optional(Path::new(global_download), sub_download),
            log_dir: global_log
                .zip(sub_log)
                .map(|(global, sub)| Path::new(global).join(sub)),
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn required_dir(s: Option<&str>) -> Option<PathBuf> {
    non_blank(s).map(PathBuf::from)
}

fn join_optional(base: &Path, sub: Option<&str>) -> PathBuf {
    sub.map_or_else(|| base.to_path_buf(), |s| base.join(s))
}
