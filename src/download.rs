//! HTTP downloads to local files.
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::DownloadError;
use crate::logging::Log;

/// Something that can fetch a URL into a file.
pub trait Fetcher: Send + Sync {
    /// Download `url` to `dest`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] if the request fails or the body cannot
    /// be written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// [`Fetcher`] backed by a blocking `ureq` agent.
///
/// The body is streamed into `<dest>.part`, which is renamed over `dest`
/// only once the transfer completes. A failed transfer leaves nothing at
/// `dest`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let request_error = |e: ureq::Error| DownloadError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = ureq::get(url).call().map_err(request_error)?;
        let mut body = response.into_body().into_reader();

        let part = part_path(dest);
        let result = write_stream(&mut body, &part).and_then(|()| fs::rename(&part, dest));
        if let Err(source) = result {
            let _ = fs::remove_file(&part);
            return Err(DownloadError::Io {
                path: dest.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}

fn write_stream(body: &mut impl Read, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(path)?;
    io::copy(body, &mut out)?;
    out.sync_all()
}

/// Temporary path used while a download is in flight.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Download `url` to `dest` unless a file is already there.
///
/// Returns `true` if a download happened.
///
/// # Errors
///
/// Propagates the [`Fetcher`] error.
pub fn ensure_downloaded(
    fetcher: &dyn Fetcher,
    url: &str,
    dest: &Path,
    log: &dyn Log,
) -> Result<bool, DownloadError> {
    if dest.is_file() {
        log.info(&format!("already downloaded: {}", dest.display()));
        return Ok(false);
    }
    log.info(&format!("downloading {url}"));
    fetcher.fetch(url, dest)?;
    log.success(&format!("downloaded to {}", dest.display()));
    Ok(true)
}

/// Lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the file cannot be read.
pub fn sha256_hex(path: &Path) -> Result<String, DownloadError> {
    let io_error = |source| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_error)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(io_error)?;
    let mut hex = String::with_capacity(64);
    for b in hasher.finalize() {
        let _ = write!(hex, "{b:02x}");
    }
    Ok(hex)
}

/// Check the file at `path` against an expected hex SHA-256 (any case).
///
/// # Errors
///
/// Returns [`DownloadError::ChecksumMismatch`] if the digests differ, or
/// [`DownloadError::Io`] if the file cannot be read.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<(), DownloadError> {
    let actual = sha256_hex(path)?;
    let expected = expected.trim().to_ascii_lowercase();
    if actual == expected {
        Ok(())
    } else {
        Err(DownloadError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        })
    }
}

/// Shared test helpers for code that downloads.
#[cfg(test)]
pub mod test_helpers {
    use super::{DownloadError, Fetcher};
    use std::path::Path;
    use std::sync::Mutex;

    /// Writes fixed bytes instead of touching the network, and records each
    /// requested URL.
    #[derive(Debug, Default)]
    pub struct FakeFetcher {
        body: Vec<u8>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        /// Create a fetcher that writes `body` for every URL.
        #[must_use]
        pub fn with_body(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// URLs requested so far.
        #[must_use]
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().map_or_else(|_| vec![], |g| g.clone())
        }
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(url.to_string());
            }
            std::fs::write(dest, &self.body).map_err(|source| DownloadError::Io {
                path: dest.to_path_buf(),
                source,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::test_helpers::FakeFetcher;
    use super::*;
    use crate::logging::Logger;

    // -----------------------------------------------------------------------
    // ensure_downloaded
    // -----------------------------------------------------------------------

    #[test]
    fn downloads_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("setup.exe");
        let fetcher = FakeFetcher::with_body(b"MZ");
        let fetched =
            ensure_downloaded(&fetcher, "https://example.test/setup.exe", &dest, &Logger::new(None))
                .unwrap();
        assert!(fetched);
        assert_eq!(fs::read(&dest).unwrap(), b"MZ");
        assert_eq!(fetcher.requests(), vec!["https://example.test/setup.exe"]);
    }

    #[test]
    fn existing_file_is_not_downloaded_again() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("setup.exe");
        fs::write(&dest, b"old").unwrap();
        let fetcher = FakeFetcher::with_body(b"new");
        let fetched =
            ensure_downloaded(&fetcher, "https://example.test/x", &dest, &Logger::new(None)).unwrap();
        assert!(!fetched);
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert!(fetcher.requests().is_empty());
    }

    // -----------------------------------------------------------------------
    // sha256
    // -----------------------------------------------------------------------

    #[test]
    fn sha256_of_known_content() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("hello");
        fs::write(&file, b"hello world").unwrap();
        assert_eq!(
            sha256_hex(&file).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn verify_accepts_uppercase_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("empty");
        fs::write(&file, b"").unwrap();
        verify_sha256(
            &file,
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
        )
        .unwrap();
    }

    #[test]
    fn verify_rejects_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("data");
        fs::write(&file, b"data").unwrap();
        let err = verify_sha256(&file, "00").unwrap_err();
        assert!(matches!(err, DownloadError::ChecksumMismatch { ref expected, .. } if expected == "00"));
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("dl").join("a.zip").as_path()),
            Path::new("dl").join("a.zip.part")
        );
    }
}
