//! Running generated scripts, for real or as a dry run.
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::builder::PowerShellScript;
use crate::error::ScriptError;
use crate::exec::Executor;
use crate::logging::Log;

/// Windows PowerShell 5, present on every supported host.
pub const POWERSHELL: &str = "powershell";

/// Something that can run a [`PowerShellScript`].
pub trait ScriptRunner: Send + Sync {
    /// Run `script`, identified by `name` in logs and errors.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if the script cannot be started or exits
    /// non-zero.
    fn run(&self, name: &str, script: &PowerShellScript) -> Result<(), ScriptError>;
}

/// Runs scripts through `powershell -File` with the execution policy
/// bypassed for that process only.
///
/// The script is written to `<temp>/<name>-<pid>.ps1` and removed after
/// the run. Output is relayed into the log line by line once the process
/// exits: stdout at info level, stderr at warn.
pub struct PowerShellRunner {
    executor: Arc<dyn Executor>,
    log: Arc<dyn Log>,
    temp_dir: PathBuf,
}

impl std::fmt::Debug for PowerShellRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerShellRunner")
            .field("executor", &self.executor)
            .field("log", &"<dyn Log>")
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

impl PowerShellRunner {
    /// Create a runner that writes scripts to the system temp directory.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>, log: Arc<dyn Log>) -> Self {
        Self {
            executor,
            log,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Write scripts to `dir` instead.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = dir;
        self
    }

    /// Where the script for `name` is written.
    #[must_use]
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.temp_dir
            .join(format!("{name}-{}.ps1", std::process::id()))
    }
}

impl ScriptRunner for PowerShellRunner {
    fn run(&self, name: &str, script: &PowerShellScript) -> Result<(), ScriptError> {
        let path = self.script_path(name);
        fs::write(&path, script.render()).map_err(|source| ScriptError::Write {
            path: path.clone(),
            source,
        })?;
        self.log.debug(&format!("running {name} from {}", path.display()));

        let path_arg = path.to_string_lossy();
        let outcome = self.executor.run_unchecked(
            POWERSHELL,
            &["-NoProfile", "-ExecutionPolicy", "Bypass", "-File", &path_arg],
        );
        if let Err(e) = fs::remove_file(&path) {
            self.log.debug(&format!("could not remove {}: {e}", path.display()));
        }
        let result = outcome.map_err(|e| ScriptError::Spawn {
            name: name.to_string(),
            reason: format!("{e:#}"),
        })?;

        for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
            self.log.info(line.trim_end());
        }
        for line in result.stderr.lines().filter(|l| !l.trim().is_empty()) {
            self.log.warn(line.trim_end());
        }

        if result.success {
            Ok(())
        } else {
            Err(ScriptError::Failed {
                name: name.to_string(),
                code: result.code.unwrap_or(-1),
            })
        }
    }
}

/// Logs what a script would do without running anything.
pub struct DryRunRunner {
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for DryRunRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DryRunRunner").finish_non_exhaustive()
    }
}

impl DryRunRunner {
    /// Create a dry-run runner logging to `log`.
    #[must_use]
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self { log }
    }
}

impl ScriptRunner for DryRunRunner {
    fn run(&self, name: &str, script: &PowerShellScript) -> Result<(), ScriptError> {
        self.log.dry_run(&format!("would run {name}"));
        for command in script.commands() {
            self.log.dry_run(&format!("  {command}"));
        }
        Ok(())
    }
}
