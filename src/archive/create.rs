//! Zip creation with optional AES-256 encryption.
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::{FileOptions, ZipWriter};
use zip::{AesMode, CompressionMethod};

use crate::error::ArchiveError;

/// Counts reported after an archive has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreationSummary {
    /// Regular files added.
    pub files: usize,
    /// Directory entries added.
    pub directories: usize,
}

/// Archive every file under `source` into `output`.
///
/// Entries are Deflate-compressed and named by their `/`-separated path
/// relative to `source`, walked in sorted order. With `password`, every
/// file entry is AES-256 encrypted. The parent of `output` is created, and
/// `output` itself is skipped if it lies inside `source`.
///
/// # Errors
///
/// Returns [`ArchiveError::Read`] if `source` cannot be walked or a file
/// cannot be opened, and [`ArchiveError::Write`] if the archive cannot be
/// written.
pub fn create(
    source: &Path,
    output: &Path,
    password: Option<&str>,
) -> Result<CreationSummary, ArchiveError> {
    let mut entries = Vec::new();
    walk(source, &mut entries)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_error(output, &e))?;
    }
    let file = File::create(output).map_err(|e| write_error(output, &e))?;
    let output_canonical = fs::canonicalize(output).ok();

    let mut file_options =
        FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    if let Some(pw) = password {
        file_options = file_options.with_aes_encryption(AesMode::Aes256, pw);
    }
    let dir_options = FileOptions::<()>::default();

    let mut zip = ZipWriter::new(file);
    let mut summary = CreationSummary::default();
    for path in entries {
        let Some(name) = entry_name(source, &path) else {
            continue;
        };
        if path.is_dir() {
            zip.add_directory(format!("{name}/"), dir_options)
                .map_err(|e| write_error(output, &e))?;
            summary.directories += 1;
            continue;
        }
        if output_canonical.is_some() && fs::canonicalize(&path).ok() == output_canonical {
            continue;
        }

        let mut reader = File::open(&path).map_err(|source| ArchiveError::Read {
            path: path.clone(),
            source,
        })?;
        zip.start_file(name, file_options)
            .map_err(|e| write_error(output, &e))?;
        io::copy(&mut reader, &mut zip).map_err(|e| write_error(output, &e))?;
        summary.files += 1;
    }
    zip.finish().map_err(|e| write_error(output, &e))?;
    Ok(summary)
}

/// Collect every directory and file below `dir`, depth first, in sorted
/// order. `dir` itself is not included.
fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    let read_error = |source| ArchiveError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut children = fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    children.sort();
    for child in children {
        let is_dir = child.is_dir();
        out.push(child.clone());
        if is_dir {
            walk(&child, out)?;
        }
    }
    Ok(())
}

/// `/`-separated name of `path` relative to `root`.
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn write_error(output: &Path, reason: &dyn std::fmt::Display) -> ArchiveError {
    ArchiveError::Write {
        path: output.to_path_buf(),
        reason: reason.to_string(),
    }
}
