//! `download-nirsoft`: fetch the NirSoft bundle into a fresh timestamped
//! folder and unpack it into a second, nested one.
//!
//! The same download/extract step is reused by `install-things`.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::Context;
use crate::archive;
use crate::cli::DownloadNirsoftArgs;
use crate::config::{self, Value};
use crate::config::install::AppDirs;
use crate::download::{ensure_downloaded, verify_sha256};
use crate::error::ConfigError;
use crate::installers::NIRSOFT;
use crate::logging::StepStatus;
use crate::timestamp::new_timestamp_segment;

/// Where one NirSoft run puts its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NirsoftPlan {
    /// `<download root>/<timestamp>`.
    pub download_dir: PathBuf,
    /// The bundle inside [`download_dir`](Self::download_dir).
    pub archive: PathBuf,
    /// `<download_dir>/<timestamp>`.
    pub extract_dir: PathBuf,
    /// `<log dir>/nirsoft_<timestamp>.log`, when a log directory is known.
    pub log_file: Option<PathBuf>,
}

impl NirsoftPlan {
    /// Lay out a run under `download_root`, stamping the download and
    /// extract folders separately.
    #[must_use]
    pub fn new(download_root: &Path, log_dir: Option<&Path>) -> Self {
        Self::with_segments(
            download_root,
            log_dir,
            &new_timestamp_segment(),
            &new_timestamp_segment(),
        )
    }

    /// Lay out a run with fixed timestamp segments.
    #[must_use]
    pub fn with_segments(
        download_root: &Path,
        log_dir: Option<&Path>,
        download_segment: &str,
        extract_segment: &str,
    ) -> Self {
        let download_dir = download_root.join(download_segment);
        Self {
            archive: download_dir.join(NIRSOFT.file_name),
            extract_dir: download_dir.join(extract_segment),
            log_file: log_dir
                .map(|dir| dir.join(format!("{}_{download_segment}.log", NIRSOFT.log_prefix))),
            download_dir,
        }
    }

    /// Resolve the directories for the `nirsoft` app key from an install
    /// manifest, using plain string lookups only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if the `install` section or the
    /// global download directory is missing.
    pub fn from_document(doc: &Value) -> Result<Self, ConfigError> {
        let dirs = AppDirs::resolve_strict(doc, NIRSOFT.app_key)?;
        Ok(Self::new(&dirs.download_dir, dirs.log_dir.as_deref()))
    }
}

/// Read the install manifest at `path` and plan a run from it.
///
/// Called before logging is set up, so that the per-app log file can become
/// the run log.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or lacks the download
/// directory.
pub fn plan_from_file(path: &Path) -> Result<NirsoftPlan> {
    let doc = config::load(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(NirsoftPlan::from_document(&doc)?)
}

/// Run `download-nirsoft` according to `plan`.
///
/// # Errors
///
/// Returns an error if the folder cannot be created, the download fails or
/// does not match `--sha256`, or extraction fails.
pub fn run(ctx: &Context, args: &DownloadNirsoftArgs, plan: &NirsoftPlan) -> Result<()> {
    ctx.log.stage("Downloading NirSoft utilities");
    if plan.log_file.is_none() {
        ctx.log.warn("no per-app log directory for nirsoft; using the run log only");
    }
    fetch_and_extract(
        ctx,
        plan,
        &args.url,
        args.password.as_deref(),
        args.sha256.as_deref(),
    )?;
    ctx.log.record_step("nirsoft", StepStatus::Ok, None);
    if let Some(path) = &plan.log_file {
        ctx.log.info(&format!("log saved at {}", path.display()));
    }
    Ok(())
}

/// Download the bundle into the plan's download folder unless it is already
/// there, optionally check its digest, and extract it.
///
/// In dry-run mode only the intended actions are logged.
///
/// # Errors
///
/// Returns an error if any step fails.
pub fn fetch_and_extract(
    ctx: &Context,
    plan: &NirsoftPlan,
    url: &str,
    password: Option<&str>,
    sha256: Option<&str>,
) -> Result<()> {
    if ctx.dry_run {
        ctx.log.dry_run(&format!(
            "would download {url} to {}",
            plan.archive.display()
        ));
        ctx.log.dry_run(&format!(
            "would extract into {}",
            plan.extract_dir.display()
        ));
        return Ok(());
    }

    fs::create_dir_all(&plan.download_dir)
        .with_context(|| format!("creating {}", plan.download_dir.display()))?;
    ctx.log.info(&format!("download folder: {}", plan.download_dir.display()));

    ensure_downloaded(ctx.fetcher.as_ref(), url, &plan.archive, ctx.log.as_ref())
        .context("downloading NirSoft bundle")?;
    if let Some(expected) = sha256 {
        verify_sha256(&plan.archive, expected)?;
        ctx.log.success("checksum verified");
    }

    let summary = archive::extract(&plan.archive, &plan.extract_dir, password)
        .with_context(|| format!("extracting {}", plan.archive.display()))?;
    ctx.log.success(&format!(
        "extracted {} files to {}",
        summary.files,
        plan.extract_dir.display()
    ));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cli::CommonOpts;
    use crate::commands::test_helpers::Harness;
    use crate::download::test_helpers::FakeFetcher;
    use crate::download::sha256_hex;

    fn bundle(h: &Harness, password: Option<&str>) -> Vec<u8> {
        h.write("bundle/NirLauncher.exe", "MZ");
        let zip = h.path("bundle.zip");
        archive::create(&h.path("bundle"), &zip, password).unwrap();
        fs::read(zip).unwrap()
    }

    fn args(password: Option<&str>, sha256: Option<String>) -> DownloadNirsoftArgs {
        DownloadNirsoftArgs {
            install: PathBuf::from("install.yaml"),
            url: NIRSOFT.url.to_string(),
            password: password.map(String::from),
            sha256,
            common: CommonOpts::default(),
        }
    }

    #[test]
    fn plan_nests_extract_folder_and_names_log() {
        let plan = NirsoftPlan::with_segments(
            Path::new("dl"),
            Some(Path::new("logs")),
            "T1",
            "T2",
        );
        assert_eq!(plan.download_dir, Path::new("dl").join("T1"));
        assert_eq!(plan.archive, Path::new("dl").join("T1").join(NIRSOFT.file_name));
        assert_eq!(plan.extract_dir, Path::new("dl").join("T1").join("T2"));
        assert_eq!(plan.log_file, Some(Path::new("logs").join("nirsoft_T1.log")));
    }

    #[test]
    fn plan_from_document_uses_strict_dirs() {
        let doc = config::loader::parse(
            "install:\n  downloads:\n    global download directory: C:\\dl\n    per app download directories:\n      NirSoft: nirsoft\n  logs:\n    global log directory: C:\\logs\n",
            Path::new("install.yaml"),
        )
        .unwrap();
        let plan = NirsoftPlan::from_document(&doc).unwrap();
        assert!(plan.download_dir.starts_with(Path::new("C:\\dl").join("nirsoft")));
        assert!(plan.log_file.is_none(), "no per-app log subdirectory");
    }

    #[test]
    fn plan_requires_download_directory() {
        let doc = config::loader::parse("install:\n  logs: {}\n", Path::new("i.yaml")).unwrap();
        assert!(matches!(
            NirsoftPlan::from_document(&doc),
            Err(ConfigError::MissingKey(_))
        ));
    }

    #[test]
    fn downloads_verifies_and_extracts_encrypted_bundle() {
        let h = Harness::new();
        let body = bundle(&h, Some("pw"));
        let h = h.with_fetcher(FakeFetcher::with_body(&body));
        let digest = sha256_hex(&h.path("bundle.zip")).unwrap().to_uppercase();
        let plan = NirsoftPlan::with_segments(&h.path("dl"), None, "A", "B");

        run(&h.context(false), &args(Some("pw"), Some(digest)), &plan).unwrap();

        assert!(plan.extract_dir.join("NirLauncher.exe").is_file());
        assert_eq!(h.fetcher.requests(), vec![NIRSOFT.url]);
        assert!(h.log_text().contains("no per-app log directory"));
    }

    #[test]
    fn existing_bundle_is_not_fetched_again() {
        let h = Harness::new();
        let body = bundle(&h, None);
        let plan = NirsoftPlan::with_segments(&h.path("dl"), None, "A", "B");
        fs::create_dir_all(&plan.download_dir).unwrap();
        fs::write(&plan.archive, &body).unwrap();

        run(&h.context(false), &args(None, None), &plan).unwrap();
        assert!(h.fetcher.requests().is_empty());
        assert!(plan.extract_dir.join("NirLauncher.exe").is_file());
    }

    #[test]
    fn checksum_mismatch_stops_before_extracting() {
        let h = Harness::new();
        let body = bundle(&h, None);
        let h = h.with_fetcher(FakeFetcher::with_body(&body));
        let plan = NirsoftPlan::with_segments(&h.path("dl"), None, "A", "B");

        let err = run(&h.context(false), &args(None, Some("00".into())), &plan).unwrap_err();
        assert!(format!("{err:#}").contains("Checksum mismatch"));
        assert!(!plan.extract_dir.exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let h = Harness::new();
        let plan = NirsoftPlan::with_segments(&h.path("dl"), None, "A", "B");
        fetch_and_extract(&h.context(true), &plan, NIRSOFT.url, None, None).unwrap();
        assert!(!plan.download_dir.exists());
        assert!(h.fetcher.requests().is_empty());
        assert!(h.log_text().contains("would extract into"));
    }
}
