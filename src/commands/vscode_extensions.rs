//! `install-vscode-extensions`: install every extension listed under
//! `vs_code_extensions` with the VS Code CLI.
use std::collections::HashSet;

use anyhow::{Result, bail};

use super::Context;
use crate::cli::InstallVscodeExtensionsArgs;
use crate::config::profile;
use crate::exec::{ExecResult, Executor};
use crate::logging::StepStatus;

/// Name of the VS Code CLI on `PATH`.
pub const CODE: &str = "code";

/// Per-run tallies for the closing summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Installed (or, in dry-run mode, would be).
    pub installed: usize,
    /// Already present before the run.
    pub already: usize,
    /// Install attempts that failed.
    pub failed: usize,
}

/// Lower-cased ids of the extensions already installed.
///
/// A listing that cannot be run, or exits non-zero, yields an empty set.
#[must_use]
pub fn installed_extensions(executor: &dyn Executor) -> HashSet<String> {
    match run_code(executor, &["--list-extensions"]) {
        Ok(result) if result.success => result
            .stdout
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .collect(),
        _ => HashSet::new(),
    }
}

/// Run `install-vscode-extensions`.
///
/// A failed install is a warning; the run carries on with the next
/// extension.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or `code` is not
/// on `PATH`.
pub fn run(ctx: &Context, args: &InstallVscodeExtensionsArgs) -> Result<()> {
    let doc = ctx.load_document(&args.config)?;
    let extensions = profile::vscode_extensions(&doc);
    if extensions.is_empty() {
        ctx.log.warn("no extensions found in the vs_code_extensions list");
        return Ok(());
    }
    if !ctx.executor.which(CODE) {
        bail!("VS Code CLI ({CODE}) not found on PATH");
    }

    ctx.log.stage(&format!("Installing {} VS Code extensions", extensions.len()));
    let installed = installed_extensions(ctx.executor.as_ref());
    ctx.log.debug(&format!("found {} installed extensions", installed.len()));

    let mut tally = Tally::default();
    for id in &extensions {
        if installed.contains(&id.to_lowercase()) {
            ctx.log.debug(&format!("ok: {id} (already installed)"));
            ctx.log.record_step(id, StepStatus::Skipped, Some("already installed"));
            tally.already += 1;
            continue;
        }
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would install extension: {id}"));
            ctx.log.record_step(id, StepStatus::DryRun, None);
            tally.installed += 1;
            continue;
        }

        ctx.log.info(&format!("installing VS Code extension: {id}"));
        match run_code(ctx.executor.as_ref(), &["--install-extension", id.as_str()]) {
            Ok(result) if result.success => {
                ctx.log.success(&format!("installed: {id}"));
                ctx.log.record_step(id, StepStatus::Ok, None);
                tally.installed += 1;
            }
            Ok(result) => {
                let detail = result.combined_output();
                ctx.log.warn(&format!("failed to install {id}: {detail}"));
                ctx.log.record_step(id, StepStatus::Failed, Some(&detail));
                tally.failed += 1;
            }
            Err(e) => {
                ctx.log.warn(&format!("failed to install {id}: {e:#}"));
                ctx.log.record_step(id, StepStatus::Failed, Some(&e.to_string()));
                tally.failed += 1;
            }
        }
    }

    ctx.log.info(&format!(
        "{} installed, {} already present, {} failed",
        tally.installed, tally.already, tally.failed
    ));
    Ok(())
}

/// Run the VS Code CLI. On Windows, the `code.cmd` wrapper needs `cmd /C`.
fn run_code(executor: &dyn Executor, args: &[&str]) -> Result<ExecResult> {
    #[cfg(target_os = "windows")]
    {
        let mut full = vec!["/C", CODE];
        full.extend_from_slice(args);
        executor.run_unchecked("cmd", &full)
    }
    #[cfg(not(target_os = "windows"))]
    {
        executor.run_unchecked(CODE, args)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cli::CommonOpts;
    use crate::commands::test_helpers::Harness;
    use crate::exec::test_helpers::FakeExecutor;
    use std::path::PathBuf;

    const CONFIG: &str = "vs_code_extensions:\n  - ms-python.python\n  - Redhat.VSCode-YAML\n  - bad.extension\n";

    fn args(config: PathBuf, dry_run: bool) -> InstallVscodeExtensionsArgs {
        InstallVscodeExtensionsArgs {
            config,
            dry_run,
            common: CommonOpts::default(),
        }
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn installs_missing_and_warns_on_failure() {
        let executor = FakeExecutor::new()
            .with_program(CODE)
            .respond(true, "redhat.vscode-yaml\n")
            .respond(true, "")
            .respond(false, "");
        let h = Harness::new().with_executor(executor);
        let config = h.write("config.yaml", CONFIG);

        run(&h.context(false), &args(config, false)).unwrap();

        let calls = h.executor.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], vec!["code", "--list-extensions"]);
        assert_eq!(calls[1], vec!["code", "--install-extension", "ms-python.python"]);
        assert_eq!(calls[2], vec!["code", "--install-extension", "bad.extension"]);

        let statuses: Vec<_> = h.log.step_entries().iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![StepStatus::Ok, StepStatus::Skipped, StepStatus::Failed]
        );
        assert!(h.log_text().contains("1 installed, 1 already present, 1 failed"));
    }

    #[test]
    fn dry_run_only_lists() {
        let h = Harness::new().with_executor(FakeExecutor::new().with_program(CODE));
        let config = h.write("config.yaml", CONFIG);
        run(&h.context(true), &args(config, true)).unwrap();

        assert_eq!(h.executor.calls().len(), 1, "only --list-extensions");
        assert!(h.log_text().contains("would install extension: bad.extension"));
    }

    #[test]
    fn empty_list_is_a_warning() {
        let h = Harness::new();
        let config = h.write("config.yaml", "vs_code_extensions: []\n");
        run(&h.context(false), &args(config, false)).unwrap();
        assert!(h.executor.calls().is_empty());
        assert!(h.log_text().contains("no extensions found"));
    }

    #[test]
    fn missing_code_cli_is_fatal() {
        let h = Harness::new();
        let config = h.write("config.yaml", CONFIG);
        let err = run(&h.context(false), &args(config, false)).unwrap_err();
        assert!(err.to_string().contains("not found on PATH"));
    }

    #[test]
    fn failed_listing_counts_as_nothing_installed() {
        let executor = FakeExecutor::new().respond(false, "ms-python.python\n");
        assert!(installed_extensions(&executor).is_empty());
    }
}
