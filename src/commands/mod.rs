//! Program pipelines, one module per binary.
//!
//! Each `run` takes a [`Context`] plus the program's parsed arguments and
//! returns once the pipeline has finished. The binaries under `src/bin/`
//! only parse arguments and hand over to [`run_program`].
pub mod archive;
pub mod download_nirsoft;
pub mod enable_ssh;
pub mod explorer;
pub mod install_things;
pub mod powershell_module;
pub mod powershell_profile;
pub mod settings;
pub mod vscode_extensions;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::CommonOpts;
use crate::config::{self, Value};
use crate::download::{Fetcher, HttpFetcher};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger, default_log_path, init_subscriber};
use crate::platform::UserDirs;
use crate::script::{DryRunRunner, PowerShellRunner, ScriptRunner};

/// Everything a pipeline talks to outside its own arguments.
pub struct Context {
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Runs external programs (`code`, `pwsh`, ...).
    pub executor: Arc<dyn Executor>,
    /// Runs generated PowerShell scripts.
    pub runner: Arc<dyn ScriptRunner>,
    /// Downloads installers and archives.
    pub fetcher: Arc<dyn Fetcher>,
    /// Well-known per-user directories.
    pub dirs: UserDirs,
    /// Log what would change instead of changing it.
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("runner", &"<dyn ScriptRunner>")
            .field("fetcher", &"<dyn Fetcher>")
            .field("dirs", &self.dirs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Build a context backed by the real system: processes, PowerShell,
    /// HTTP and the current user's environment.
    ///
    /// With `dry_run`, scripts are logged by a [`DryRunRunner`] instead of
    /// being executed.
    #[must_use]
    pub fn system(log: Arc<dyn Log>, dry_run: bool) -> Self {
        let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
        let runner: Arc<dyn ScriptRunner> = if dry_run {
            Arc::new(DryRunRunner::new(Arc::clone(&log)))
        } else {
            Arc::new(PowerShellRunner::new(Arc::clone(&executor), Arc::clone(&log)))
        };
        Self {
            log,
            executor,
            runner,
            fetcher: Arc::new(HttpFetcher),
            dirs: UserDirs::from_env(),
            dry_run,
        }
    }

    /// The same context logging through `log` instead.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            log,
            executor: Arc::clone(&self.executor),
            runner: Arc::clone(&self.runner),
            fetcher: Arc::clone(&self.fetcher),
            dirs: self.dirs.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Create `dir` and its parents, or log that it would be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if self.dry_run {
            self.log.dry_run(&format!("would create {}", dir.display()));
            return Ok(());
        }
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
    }

    /// Load the YAML document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_document(&self, path: &Path) -> Result<Value> {
        self.log.debug(&format!("reading {}", path.display()));
        config::load(path).with_context(|| format!("loading {}", path.display()))
    }
}

/// Run a program's pipeline with logging set up, and turn its outcome into
/// an exit code.
///
/// The run log goes to `--log` if given, else `log_file`, else
/// [`default_log_path`]. A log file that cannot be opened is a warning and
/// the run continues on the console only. A pipeline error is logged with
/// its full cause chain.
pub fn run_program<F>(
    program: &str,
    common: &CommonOpts,
    log_file: Option<PathBuf>,
    body: F,
) -> ExitCode
where
    F: FnOnce(&Arc<Logger>) -> Result<()>,
{
    let _ = enable_ansi_support::enable_ansi_support();

    let path = common
        .log
        .clone()
        .or(log_file)
        .unwrap_or_else(|| default_log_path(program));
    let open_error = init_subscriber(common.verbose, program, Some(&path)).err();
    let log = Arc::new(Logger::new(open_error.is_none().then(|| path.clone())));
    if let Some(e) = open_error {
        log.warn(&format!("cannot open log file {}: {e}", path.display()));
    }

    let result = body(&log);
    log.print_summary();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
