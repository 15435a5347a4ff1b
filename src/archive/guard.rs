//! Path-traversal guard for archive entries.
//!
//! Entry names are resolved lexically against the destination: `.` segments
//! are dropped and `..` pops the previous segment. The result must be a
//! strict descendant of the destination, so names that climb out of it,
//! absolute names, drive-qualified names, and names that collapse onto the
//! destination itself are all rejected before anything is written.
//!
//! The guard is stricter than a pure descendant check: a `:` anywhere past
//! a leading drive prefix is refused as well, even on hosts where the name
//! would be legal, since Windows reads it as an alternate data stream.
use std::path::{Path, PathBuf};

use crate::error::ExtractionError;

/// Resolve `entry_name` under `dest`.
///
/// Both `/` and `\` separate segments, since archives built on Windows may
/// use either.
///
/// # Errors
///
/// Returns [`ExtractionError::PathTraversal`] if the cleaned path is not a
/// strict descendant of `dest` or starts with a drive prefix, and
/// [`ExtractionError::IllegalName`] if any other segment contains `:`.
pub fn resolve_entry_path(dest: &Path, entry_name: &str) -> Result<PathBuf, ExtractionError> {
    let traversal = || ExtractionError::PathTraversal {
        entry: entry_name.to_string(),
    };

    let normalized = entry_name.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(traversal());
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(traversal());
                }
            }
            s if s.contains(':') => {
                if segments.is_empty() && is_drive_prefix(s) {
                    return Err(traversal());
                }
                return Err(ExtractionError::IllegalName {
                    entry: entry_name.to_string(),
                });
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(traversal());
    }

    let mut out = dest.to_path_buf();
    out.extend(segments);
    Ok(out)
}

/// `C:` or `C:rest`.
fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.first().is_some_and(u8::is_ascii_alphabetic) && bytes.get(1) == Some(&b':')
}
