//! Read-modify-write of a JSON settings file.
//!
//! An edit reads the current document, copies the original bytes to a
//! timestamped backup, applies a transformation, and writes the result
//! through a sibling `.tmp` file that is then renamed over the original.
//! A document the transformation leaves unchanged is not rewritten.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize as _;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::SettingsError;
use crate::logging::Log;
use crate::timestamp;

/// What to do when the settings file does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenMissing {
    /// Start from an empty object.
    EmptyObject,
    /// Start from an empty array.
    EmptyArray,
    /// Fail with [`SettingsError::NotFound`].
    Fail,
}

/// Result of a completed edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The file was written. `backup` names the copy of the previous
    /// contents, if there were any and the copy succeeded.
    Written {
        /// Backup file, if one was made.
        backup: Option<PathBuf>,
    },
    /// The document already had the desired content.
    Unchanged,
}

/// Apply `transform` to the JSON document at `path`.
///
/// # Errors
///
/// - [`SettingsError::NotFound`] if the file is absent and `missing` is
///   [`WhenMissing::Fail`]
/// - [`SettingsError::Parse`] if the file is not valid JSON
/// - whatever `transform` returns
/// - [`SettingsError::Io`] if the file cannot be read or written
///
/// A failed backup is reported through `log` and does not stop the edit.
pub fn edit<F>(
    path: &Path,
    missing: WhenMissing,
    log: &dyn Log,
    transform: F,
) -> Result<EditOutcome, SettingsError>
where
    F: FnOnce(&mut Value) -> Result<(), SettingsError>,
{
    let original = read_bytes(path)?;
    let existing = original.as_deref().map(|b| parse(path, b)).transpose()?.flatten();
    let mut document = match (&existing, missing) {
        (Some(doc), _) => doc.clone(),
        (None, WhenMissing::EmptyObject) => Value::Object(serde_json::Map::new()),
        (None, WhenMissing::EmptyArray) => Value::Array(Vec::new()),
        (None, WhenMissing::Fail) if original.is_some() => {
            return Err(SettingsError::Shape(format!("{} is empty", path.display())));
        }
        (None, WhenMissing::Fail) => return Err(SettingsError::NotFound(path.to_path_buf())),
    };

    transform(&mut document)?;

    if existing.as_ref() == Some(&document) {
        log.debug(&format!("{} already up to date", path.display()));
        return Ok(EditOutcome::Unchanged);
    }

    let backup = original.as_deref().and_then(|bytes| match backup(path, bytes) {
        Ok(copy) => {
            log.debug(&format!("backup written to {}", copy.display()));
            Some(copy)
        }
        Err(e) => {
            log.warn(&format!("backup of {} failed: {e}", path.display()));
            None
        }
    });

    write_atomic(path, &document)?;
    Ok(EditOutcome::Written { backup })
}

/// Serialize `value` with four-space indentation and a trailing newline.
///
/// # Errors
///
/// Returns an error only if a map key fails to serialize, which cannot
/// happen for a [`Value`].
pub fn to_pretty_string(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `value` to `path` through a `.tmp` sibling and a rename.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if the directory, temp file, or rename
/// fails.
pub fn write_atomic(path: &Path, value: &Value) -> Result<(), SettingsError> {
    let io_error = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = to_pretty_string(value).map_err(|e| io_error(io::Error::other(e)))?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let tmp = sibling(path, ".tmp");
    fs::write(&tmp, text).map_err(io_error)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(e));
    }
    Ok(())
}

/// Path of the backup for `path`: `<name>.bak.<YYYYMMDD_HHMMSS>`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, &format!(".bak.{}", timestamp::backup_suffix()))
}

fn backup(path: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    let copy = backup_path(path);
    fs::write(&copy, bytes)?;
    Ok(copy)
}

fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, SettingsError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse the file contents; a blank file yields `None`.
fn parse(path: &Path, bytes: &[u8]) -> Result<Option<Value>, SettingsError> {
    // Notepad and PowerShell 5 like to prepend a BOM.
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}
