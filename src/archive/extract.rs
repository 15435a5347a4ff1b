//! Zip extraction with optional per-entry decryption.
use std::fs::{self, File};
use std::io::{BufReader, Read, Write as _};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use super::guard::resolve_entry_path;
use crate::error::ExtractionError;

const COPY_BUFFER: usize = 64 * 1024;

/// Counts reported after a successful extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Regular files written.
    pub files: usize,
    /// Directory entries created.
    pub directories: usize,
}

/// Extract every entry of `archive` into `dest`.
///
/// `dest` is created if absent. Encrypted entries need `password`;
/// unencrypted entries are read as-is whether or not one is given. Entries
/// are processed in archive order and each name passes the traversal guard
/// before anything is written for it. The first failure aborts the run.
///
/// # Errors
///
/// - [`ExtractionError::ArchiveUnreadable`] if the archive cannot be opened
///   or an entry is corrupt
/// - [`ExtractionError::DecryptionFailed`] if an encrypted entry is met
///   without a password or with a wrong one
/// - [`ExtractionError::PathTraversal`] if an entry resolves outside `dest`
/// - [`ExtractionError::IllegalName`] if an entry name contains `:`
/// - [`ExtractionError::Write`] if a directory or file cannot be written
pub fn extract(
    archive: &Path,
    dest: &Path,
    password: Option<&str>,
) -> Result<ExtractionSummary, ExtractionError> {
    let file = File::open(archive).map_err(|e| unreadable(archive, &e))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| unreadable(archive, &e))?;
    create_dir(dest)?;

    let mut summary = ExtractionSummary::default();
    for index in 0..zip.len() {
        let (name, is_dir, encrypted) = {
            let raw = zip
                .by_index_raw(index)
                .map_err(|e| unreadable(archive, &e))?;
            (raw.name().to_string(), raw.is_dir(), raw.encrypted())
        };

        let out_path = resolve_entry_path(dest, &name)?;
        if is_dir {
            create_dir(&out_path)?;
            summary.directories += 1;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            create_dir(parent)?;
        }

        let opened = match (encrypted, password) {
            (true, Some(pw)) => zip.by_index_decrypt(index, pw.as_bytes()),
            (true, None) => return Err(ExtractionError::DecryptionFailed { entry: name }),
            (false, _) => zip.by_index(index),
        };
        let mut entry = opened.map_err(|e| match e {
            ZipError::InvalidPassword => ExtractionError::DecryptionFailed {
                entry: name.clone(),
            },
            ZipError::UnsupportedArchive(msg) if msg == ZipError::PASSWORD_REQUIRED => {
                ExtractionError::DecryptionFailed {
                    entry: name.clone(),
                }
            }
            other => unreadable(archive, &other),
        })?;

        if let Err(e) = copy_entry(&mut entry, &out_path) {
            // Never leave a truncated or garbage file behind.
            let _ = fs::remove_file(&out_path);
            return Err(match e {
                CopyError::Read(_) if encrypted => ExtractionError::DecryptionFailed { entry: name },
                CopyError::Read(source) => unreadable(archive, &source),
                CopyError::Write(source) => ExtractionError::Write {
                    path: out_path,
                    source,
                },
            });
        }
        summary.files += 1;
    }
    Ok(summary)
}

enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Stream `reader` into a newly created (truncated) file at `path`.
///
/// Read and write failures are kept apart: a read failure on an encrypted
/// entry means the password was wrong (AES authentication fails at the end
/// of the stream), while a write failure is a filesystem problem.
fn copy_entry(reader: &mut impl Read, path: &Path) -> Result<(), CopyError> {
    let mut out = File::create(path).map_err(CopyError::Write)?;
    let mut buf = vec![0u8; COPY_BUFFER];
    loop {
        let n = reader.read(&mut buf).map_err(CopyError::Read)?;
        if n == 0 {
            break;
        }
        let chunk = buf.get(..n).unwrap_or_default();
        out.write_all(chunk).map_err(CopyError::Write)?;
    }
    out.flush().map_err(CopyError::Write)
}

fn create_dir(path: &Path) -> Result<(), ExtractionError> {
    fs::create_dir_all(path).map_err(|source| ExtractionError::Write {
        path: PathBuf::from(path),
        source,
    })
}

fn unreadable(archive: &Path, reason: &dyn std::fmt::Display) -> ExtractionError {
    ExtractionError::ArchiveUnreadable {
        path: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}
