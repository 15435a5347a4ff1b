//! Domain-specific error types for the provisioning utilities.
//!
//! Library modules return the typed errors below. Command handlers at the
//! binary boundary convert them to [`anyhow::Error`] with `?` and add
//! context there.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisionError
//! ├── Config(ConfigError)          YAML loading and key resolution
//! ├── Extraction(ExtractionError)  archive extraction
//! ├── Archive(ArchiveError)        archive creation
//! ├── Settings(SettingsError)      JSON settings editors
//! ├── Script(ScriptError)          generated PowerShell scripts
//! ├── Download(DownloadError)      HTTP downloads
//! └── Platform(PlatformError)      well-known Windows directories
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type aggregating every domain error.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Configuration document error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Archive extraction error.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Archive creation error.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Settings editor error.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Generated script error.
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Download error.
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Platform lookup error.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors that arise while loading or resolving a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be read from disk.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path of the unreadable document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("Invalid YAML in {path}: {message}")]
    Parse {
        /// Path of the malformed document.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The document root is a scalar or sequence instead of a mapping.
    #[error("Document root of {path} is a {found}, not a mapping")]
    NotAMapping {
        /// Document path.
        path: PathBuf,
        /// Kind of node found at the root.
        found: &'static str,
    },

    /// A key the program cannot run without is absent or empty.
    #[error("Missing required key '{0}'")]
    MissingKey(String),
}

/// Errors that arise while extracting an archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The archive cannot be opened or its directory is corrupt.
    #[error("Archive {path} is unreadable: {reason}")]
    ArchiveUnreadable {
        /// Archive path.
        path: PathBuf,
        /// Reader diagnostic.
        reason: String,
    },

    /// An encrypted entry was met without a password, or the password is wrong.
    #[error("Cannot decrypt entry '{entry}': password missing or incorrect")]
    DecryptionFailed {
        /// Name of the entry inside the archive.
        entry: String,
    },

    /// An entry resolves outside the extraction directory.
    #[error("Illegal file path in archive: {entry}")]
    PathTraversal {
        /// Name of the offending entry, as stored in the archive.
        entry: String,
    },

    /// An entry name holds a `:` that Windows would read as a stream name.
    #[error("Illegal file name in archive: {entry} (':' is not allowed)")]
    IllegalName {
        /// Name of the offending entry, as stored in the archive.
        entry: String,
    },

    /// Writing to the extraction directory failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Output path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while creating an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The source directory cannot be walked or a file cannot be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The output archive cannot be written.
    #[error("Failed to write archive {path}: {reason}")]
    Write {
        /// Archive path.
        path: PathBuf,
        /// Writer diagnostic.
        reason: String,
    },
}

/// Errors that arise while editing a JSON settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file exists but cannot be read, or cannot be written back.
    #[error("IO error on settings file {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The document parsed but does not have the expected structure.
    #[error("Unexpected settings layout: {0}")]
    Shape(String),

    /// A settings file that must already exist is missing.
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),
}

/// Errors that arise while running a generated PowerShell script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script file could not be written to the temp directory.
    #[error("Failed to write script {path}: {source}")]
    Write {
        /// Script path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The interpreter could not be started.
    #[error("Failed to start PowerShell for '{name}': {reason}")]
    Spawn {
        /// Script name.
        name: String,
        /// Executor diagnostic.
        reason: String,
    },

    /// The interpreter exited with a non-zero status.
    #[error("Script '{name}' failed (exit {code})")]
    Failed {
        /// Script name.
        name: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
    },
}

/// Errors that arise while downloading a file.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The HTTP request failed or returned an error status.
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Requested URL.
        url: String,
        /// Transport or status diagnostic.
        reason: String,
    },

    /// Writing the response body to disk failed.
    #[error("Failed to save download to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The downloaded file does not match the expected digest.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Downloaded file.
        path: PathBuf,
        /// Expected lowercase hex SHA-256.
        expected: String,
        /// Actual lowercase hex SHA-256.
        actual: String,
    },
}

/// Errors that arise while resolving well-known Windows directories.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A required environment variable is not set.
    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // ConfigError
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_missing_key_display() {
        let e = ConfigError::MissingKey("global log directory".to_string());
        assert_eq!(e.to_string(), "Missing required key 'global log directory'");
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("install.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("install.yaml"));
    }

    // -----------------------------------------------------------------------
    // ExtractionError
    // -----------------------------------------------------------------------

    #[test]
    fn path_traversal_display_names_entry() {
        let e = ExtractionError::PathTraversal {
            entry: "../../evil.txt".to_string(),
        };
        assert_eq!(e.to_string(), "Illegal file path in archive: ../../evil.txt");
    }

    #[test]
    fn illegal_name_display_mentions_colon() {
        let e = ExtractionError::IllegalName {
            entry: "notes:v1.txt".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Illegal file name in archive: notes:v1.txt (':' is not allowed)"
        );
    }

    #[test]
    fn decryption_failed_display() {
        let e = ExtractionError::DecryptionFailed {
            entry: "secret.txt".to_string(),
        };
        assert!(e.to_string().contains("secret.txt"));
        assert!(e.to_string().contains("password"));
    }

    #[test]
    fn write_error_has_source() {
        use std::error::Error as StdError;
        let e = ExtractionError::Write {
            path: PathBuf::from("out/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
    }

    // -----------------------------------------------------------------------
    // ScriptError / DownloadError
    // -----------------------------------------------------------------------

    #[test]
    fn script_failed_display() {
        let e = ScriptError::Failed {
            name: "install-go".to_string(),
            code: 3,
        };
        assert_eq!(e.to_string(), "Script 'install-go' failed (exit 3)");
    }

    #[test]
    fn checksum_mismatch_display() {
        let e = DownloadError::ChecksumMismatch {
            path: PathBuf::from("a.zip"),
            expected: "00".to_string(),
            actual: "ff".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Checksum mismatch for a.zip: expected 00, got ff"
        );
    }

    // -----------------------------------------------------------------------
    // ProvisionError conversions
    // -----------------------------------------------------------------------

    #[test]
    fn provision_error_from_extraction_error() {
        let e: ProvisionError = ExtractionError::PathTraversal {
            entry: "../x".to_string(),
        }
        .into();
        assert!(e.to_string().starts_with("Extraction error"));
    }

    #[test]
    fn provision_error_from_platform_error() {
        let e: ProvisionError = PlatformError::MissingEnv("APPDATA").into();
        assert_eq!(
            e.to_string(),
            "Platform error: Environment variable APPDATA is not set"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ProvisionError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<ExtractionError>();
        assert_send_sync::<ArchiveError>();
        assert_send_sync::<SettingsError>();
        assert_send_sync::<ScriptError>();
        assert_send_sync::<DownloadError>();
    }

    #[test]
    fn settings_error_converts_to_anyhow() {
        let e = SettingsError::Shape("profiles.list is not an array".to_string());
        let _anyhow_err: anyhow::Error = e.into();
    }
}
