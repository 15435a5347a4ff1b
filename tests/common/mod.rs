// Shared helpers for integration tests.
//
// Fakes for the public `ScriptRunner`, `Fetcher` and `Executor` traits, a
// temp-dir-backed environment that wires them into a `Context`, and a zip
// fixture writer that can produce entries the archive creator never would.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use workstation_cli::commands::Context;
use workstation_cli::error::{DownloadError, ScriptError};
use workstation_cli::exec::{ExecResult, Executor};
use workstation_cli::download::Fetcher;
use workstation_cli::logging::Logger;
use workstation_cli::platform::UserDirs;
use workstation_cli::script::{PowerShellScript, ScriptRunner};
use zip::write::{FileOptions, ZipWriter};

/// Records `(name, rendered script)` for every run.
#[derive(Default)]
pub struct FakeRunner {
    runs: Mutex<Vec<(String, String)>>,
}

impl FakeRunner {
    pub fn names(&self) -> Vec<String> {
        self.runs().into_iter().map(|(name, _)| name).collect()
    }

    pub fn runs(&self) -> Vec<(String, String)> {
        self.runs.lock().expect("runner lock").clone()
    }
}

impl ScriptRunner for FakeRunner {
    fn run(&self, name: &str, script: &PowerShellScript) -> Result<(), ScriptError> {
        self.runs
            .lock()
            .expect("runner lock")
            .push((name.to_string(), script.render()));
        Ok(())
    }
}

/// Serves the same body for every URL.
pub struct FakeFetcher {
    body: Vec<u8>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("fetcher lock").clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.requests
            .lock()
            .expect("fetcher lock")
            .push(url.to_string());
        fs::write(dest, &self.body).map_err(|source| DownloadError::Io {
            path: dest.to_path_buf(),
            source,
        })
    }
}

/// Succeeds at everything and finds nothing on `PATH`.
#[derive(Debug, Default)]
pub struct QuietExecutor;

impl Executor for QuietExecutor {
    fn run(&self, _program: &str, _args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(ExecResult {
            success: true,
            code: Some(0),
            ..ExecResult::default()
        })
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.run(program, args)
    }

    fn which(&self, _program: &str) -> bool {
        false
    }
}

/// An isolated environment backed by a [`tempfile::TempDir`].
pub struct TestEnv {
    pub root: tempfile::TempDir,
    pub runner: Arc<FakeRunner>,
    pub fetcher: Arc<FakeFetcher>,
    pub log: Arc<Logger>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_download(Vec::new())
    }

    /// An environment whose fetcher serves `body`.
    pub fn with_download(body: Vec<u8>) -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
            runner: Arc::new(FakeRunner::default()),
            fetcher: Arc::new(FakeFetcher::new(body)),
            log: Arc::new(Logger::new(None)),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write `text` to `name`, creating parent directories.
    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, text).expect("write fixture");
        path
    }

    /// A context over the fakes, with user directories inside the temp dir.
    pub fn context(&self, dry_run: bool) -> Context {
        Context {
            log: self.log.clone(),
            executor: Arc::new(QuietExecutor),
            runner: self.runner.clone(),
            fetcher: self.fetcher.clone(),
            dirs: UserDirs {
                app_data: Some(self.path("Roaming")),
                local_app_data: Some(self.path("Local")),
                user_profile: Some(self.path("User")),
            },
            dry_run,
        }
    }
}

/// Build a zip at `path` from `(name, contents)` pairs, storing names
/// verbatim. Names ending in `/` become directory entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])], password: Option<&str>) {
    let mut zip = ZipWriter::new(File::create(path).expect("create zip"));
    for (name, contents) in entries {
        let mut options = FileOptions::<()>::default();
        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add directory");
            continue;
        }
        if let Some(pw) = password {
            options = options.with_aes_encryption(zip::AesMode::Aes256, pw);
        }
        zip.start_file(*name, options).expect("start entry");
        zip.write_all(contents).expect("write entry");
    }
    zip.finish().expect("finish zip");
}
