//! `install-things`: install every program listed in the install manifest.
//!
//! Chocolatey is installed first. Each label is then dispatched through
//! [`Handler`]; most map straight onto a module function, a few download an
//! installer or archive first. The first failing step stops the run.
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::Context;
use super::download_nirsoft::{NirsoftPlan, fetch_and_extract};
use crate::archive;
use crate::cli::InstallThingsArgs;
use crate::config::install::InstallLayout;
use crate::download::ensure_downloaded;
use crate::installers::{
    self, CHERRY_TREE, Download, Handler, INSTALL_CHOCO, MINICONDA, MINICONDA_PATH_ENTRIES, NIRSOFT,
    SQL_DEVELOPER,
};
use crate::logging::{AppLog, StepStatus};
use crate::script::PowerShellScript;
use crate::timestamp::compact_timestamp;

/// Run `install-things`.
///
/// # Errors
///
/// Returns an error if Chocolatey cannot be installed, the manifest cannot
/// be loaded or lacks its global directories, or any program fails to
/// install.
pub fn run(ctx: &Context, args: &InstallThingsArgs) -> Result<()> {
    let installer = Installer { ctx, args };

    ctx.log.stage("Installing Chocolatey");
    ctx.runner
        .run("install-choco", &installer.script().call(INSTALL_CHOCO))
        .context("installing Chocolatey")?;
    ctx.log.success("Chocolatey installation complete");
    ctx.log.record_step("Chocolatey", installer.done_status(), None);

    ctx.log.stage("Reading install manifest");
    let doc = ctx.load_document(&args.install)?;
    let layout = InstallLayout::resolve(&doc)?;
    ctx.ensure_dir(&layout.global_log_dir)?;
    ctx.ensure_dir(&layout.global_download_dir)?;
    ctx.log.info(&format!("{} programs listed", layout.programs.len()));
    if layout.programs.is_empty() {
        ctx.log.warn("install.programs to install is empty");
    }

    for label in &layout.programs {
        let handler = Handler::for_label(label);
        if handler == Handler::Skip {
            ctx.log.debug(&format!("{label}: installed up front, skipping"));
            continue;
        }
        ctx.log.stage(&format!(
            "Starting: {label} → {}",
            installers::install_function_name(label)
        ));
        if let Err(e) = installer.install(label, &handler, &layout) {
            ctx.log.record_step(label, StepStatus::Failed, Some(&format!("{e:#}")));
            return Err(e.context(format!("installing {label}")));
        }
        ctx.log.record_step(label, installer.done_status(), None);
    }

    ctx.log.success("all installations completed");
    Ok(())
}

/// Defender exclusion for `path`, added only if not already present.
#[must_use]
pub fn defender_exclusion_script(path: &Path) -> PowerShellScript {
    PowerShellScript::new()
        .line(format!(
            "$path = {}",
            crate::script::quote(&path.to_string_lossy())
        ))
        .line("if (-not ((Get-MpPreference).ExclusionPath -contains $path)) {")
        .line("    Add-MpPreference -ExclusionPath $path")
        .line("}")
}

struct Installer<'a> {
    ctx: &'a Context,
    args: &'a InstallThingsArgs,
}

impl Installer<'_> {
    /// A script importing the provisioning module.
    fn script(&self) -> PowerShellScript {
        PowerShellScript::new().import_module(&self.args.module)
    }

    const fn done_status(&self) -> StepStatus {
        if self.ctx.dry_run {
            StepStatus::DryRun
        } else {
            StepStatus::Ok
        }
    }

    fn install(&self, label: &str, handler: &Handler, layout: &InstallLayout) -> Result<()> {
        match handler {
            Handler::Skip => Ok(()),
            Handler::SqlDeveloper => self.sql_developer(layout),
            Handler::Nirsoft => self.nirsoft(layout),
            Handler::CherryTree => self.cherry_tree(layout),
            Handler::Miniconda => self.miniconda(layout),
            Handler::Module(function) => self
                .ctx
                .runner
                .run(&installers::script_name(label), &self.script().call(function))
                .map_err(Into::into),
        }
    }

    /// A context that also writes to the app's own log file, when the
    /// manifest gives the app a log subdirectory.
    fn app_context(&self, layout: &InstallLayout, app: &Download) -> Context {
        if self.ctx.dry_run || layout.app_log_subdir(app.app_key).is_none() {
            return self.ctx.with_log(Arc::clone(&self.ctx.log));
        }
        let path = layout
            .app_log_dir(app.app_key)
            .join(format!("{}_{}.log", app.log_prefix, compact_timestamp()));
        self.open_app_log(&path, app)
    }

    fn open_app_log(&self, path: &Path, app: &Download) -> Context {
        match AppLog::open(Arc::clone(&self.ctx.log), path, app.app_key) {
            Ok(app_log) => {
                self.ctx
                    .log
                    .info(&format!("{} log path: {}", app.app_key, path.display()));
                self.ctx.with_log(Arc::new(app_log))
            }
            Err(e) => {
                self.ctx
                    .log
                    .warn(&format!("cannot open {}: {e}", path.display()));
                self.ctx.with_log(Arc::clone(&self.ctx.log))
            }
        }
    }

    fn sql_developer(&self, layout: &InstallLayout) -> Result<()> {
        let ctx = self.app_context(layout, &SQL_DEVELOPER);
        let dir = layout.app_download_dir(SQL_DEVELOPER.app_key);
        ctx.ensure_dir(&dir)?;

        let zip = dir.join(SQL_DEVELOPER.file_name);
        let extract_dir = dir.join(
            Path::new(SQL_DEVELOPER.file_name)
                .file_stem()
                .unwrap_or_default(),
        );
        download(&ctx, &SQL_DEVELOPER, &zip)?;

        if ctx.dry_run {
            ctx.log.dry_run(&format!("would extract into {}", extract_dir.display()));
        } else {
            ctx.log.info(&format!("extracting SQL Developer to {}", extract_dir.display()));
            archive::extract(&zip, &extract_dir, None)
                .with_context(|| format!("extracting {}", zip.display()))?;
            ctx.log.success("SQL Developer extracted");
        }

        let exe = extract_dir.join("sqldeveloper").join("sqldeveloper.exe");
        let exe = exe.to_string_lossy().into_owned();
        let shortcut = self.script().call_with(
            "New-DesktopShortcut",
            &[
                ("TargetPath", exe.as_str()),
                ("Description", "Oracle SQL Developer"),
            ],
        );
        ctx.runner.run("create-sqldeveloper-shortcut", &shortcut)?;
        ctx.log.success("SQL Developer shortcut created on desktop");
        Ok(())
    }

    fn nirsoft(&self, layout: &InstallLayout) -> Result<()> {
        let log_dir = layout
            .app_log_subdir(NIRSOFT.app_key)
            .map(|_| layout.app_log_dir(NIRSOFT.app_key));
        let base_dir = layout.app_download_dir(NIRSOFT.app_key);
        let plan = NirsoftPlan::new(&base_dir, log_dir.as_deref());
        let ctx = match &plan.log_file {
            Some(path) if !self.ctx.dry_run => self.open_app_log(path, &NIRSOFT),
            _ => self.ctx.with_log(Arc::clone(&self.ctx.log)),
        };

        if let Err(e) = ctx.runner.run(
            "exclude-nirsoft-from-defender",
            &defender_exclusion_script(&base_dir),
        ) {
            ctx.log.warn(&format!("failed to add Defender exclusion: {e}"));
        } else {
            ctx.log.info(&format!("Defender exclusion in place for {}", base_dir.display()));
        }

        fetch_and_extract(
            &ctx,
            &plan,
            NIRSOFT.url,
            self.args.nirsoft_password.as_deref(),
            None,
        )
    }

    fn cherry_tree(&self, layout: &InstallLayout) -> Result<()> {
        let ctx = self.ctx;
        let install_dir = layout.app_download_dir(CHERRY_TREE.app_key);
        let log_dir = layout.app_log_dir(CHERRY_TREE.app_key);
        ctx.ensure_dir(&install_dir)?;
        ctx.ensure_dir(&log_dir)?;

        let installer = install_dir.join(CHERRY_TREE.file_name);
        download(ctx, &CHERRY_TREE, &installer)?;

        let log_path = log_dir.join(format!(
            "{}_{}.log",
            CHERRY_TREE.log_prefix,
            compact_timestamp()
        ));
        ctx.log.info(&format!("CherryTree log path: {}", log_path.display()));
        let log_arg = log_path.to_string_lossy().into_owned();
        let install_arg = install_dir.to_string_lossy().into_owned();
        let script = self.script().call_with(
            "Install-CherryTree",
            &[("log", log_arg.as_str()), ("installPath", install_arg.as_str())],
        );
        ctx.runner.run("install-cherrytree", &script)?;
        Ok(())
    }

    fn miniconda(&self, layout: &InstallLayout) -> Result<()> {
        let ctx = self.ctx;
        let dir = layout.app_download_dir(MINICONDA.app_key);
        ctx.ensure_dir(&dir)?;

        let installer = dir.join(MINICONDA.file_name);
        download(ctx, &MINICONDA, &installer)?;

        let installer_arg = installer.to_string_lossy().into_owned();
        let mut script = self
            .script()
            .call_with("Install-Miniconda", &[("InstallerPath", installer_arg.as_str())])
            .blank();
        for entry in MINICONDA_PATH_ENTRIES {
            script = script.call_with("Add-ToPath", &[("PathToAdd", entry)]);
        }
        ctx.runner.run("install-miniconda", &script)?;
        Ok(())
    }
}

/// Fetch `app` to `dest` unless it is already there.
fn download(ctx: &Context, app: &Download, dest: &Path) -> Result<()> {
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would download {} to {}", app.url, dest.display()));
        return Ok(());
    }
    ensure_downloaded(ctx.fetcher.as_ref(), app.url, dest, ctx.log.as_ref())
        .with_context(|| format!("downloading {}", app.file_name))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cli::CommonOpts;
    use crate::commands::test_helpers::Harness;
    use crate::download::test_helpers::FakeFetcher;
    use crate::script::test_helpers::RecordingRunner;
    use std::fs;
    use std::path::PathBuf;

    const MODULE: &str = r"C:\mods\Tools.psm1";

    fn manifest(h: &Harness, programs: &[&str]) -> PathBuf {
        let list: String = programs.iter().map(|p| format!("    - {p}\n")).collect();
        let text = format!(
            "install:\n  programs to install:\n{list}  logs:\n    global log directory: '{logs}'\n    per app log directories:\n      nirsoft: nirsoft\n      sql developer: sqldeveloper\n  downloads:\n    global download directory: '{dl}'\n    per app download directories:\n      nirsoft: nirsoft\n      sql developer: sqldeveloper\n      python: miniconda\n",
            logs = h.path("logs").display(),
            dl = h.path("downloads").display(),
        );
        h.write("install.yaml", &text)
    }

    fn args(install: PathBuf, dry_run: bool) -> InstallThingsArgs {
        InstallThingsArgs {
            install,
            module: PathBuf::from(MODULE),
            nirsoft_password: None,
            dry_run,
            common: CommonOpts::default(),
        }
    }

    /// A zip holding `sqldeveloper/sqldeveloper.exe`, usable for every
    /// download in a run.
    fn payload(h: &Harness) -> Vec<u8> {
        h.write("payload/sqldeveloper/sqldeveloper.exe", "MZ");
        let zip = h.path("payload.zip");
        archive::create(&h.path("payload"), &zip, None).unwrap();
        fs::read(zip).unwrap()
    }

    #[test]
    fn module_labels_run_in_order_and_choco_is_skipped() {
        let h = Harness::new();
        let install = manifest(&h, &["Choco", "Go", "7-Zip", "chocolatey", "Voidtools Everything"]);
        run(&h.context(false), &args(install, false)).unwrap();

        assert_eq!(
            h.runner.names(),
            vec![
                "install-choco",
                "install-go",
                "install-7-zip",
                "install-voidtools-everything"
            ]
        );
        let runs = h.runner.runs();
        insta::assert_snapshot!(runs[0].1, @r"
        Import-Module 'C:\mods\Tools.psm1'
        Install-Choco
        ");
        assert!(runs[3].1.ends_with("Install-Voidtools-Everything\n"));
        assert!(h.path("logs").is_dir());
        assert!(h.path("downloads").is_dir());
        let steps: Vec<_> = h.log.step_entries().into_iter().map(|s| s.name).collect();
        assert_eq!(steps, vec!["Chocolatey", "Go", "7-Zip", "Voidtools Everything"]);
    }

    #[test]
    fn download_handlers_fetch_then_script() {
        let h = Harness::new();
        let body = payload(&h);
        let h = h.with_fetcher(FakeFetcher::with_body(&body));
        let install = manifest(&h, &["SQL Developer", "Python", "Cherry Tree", "NirSoft"]);
        run(&h.context(false), &args(install, false)).unwrap();

        assert_eq!(
            h.runner.names(),
            vec![
                "install-choco",
                "create-sqldeveloper-shortcut",
                "install-miniconda",
                "install-cherrytree",
                "exclude-nirsoft-from-defender"
            ]
        );
        assert_eq!(
            h.fetcher.requests(),
            vec![SQL_DEVELOPER.url, MINICONDA.url, CHERRY_TREE.url, NIRSOFT.url]
        );

        let sql_dir = h.path("downloads").join("sqldeveloper");
        let exe = sql_dir
            .join("sqldeveloper-24.3.1.347.1826-x64")
            .join("sqldeveloper")
            .join("sqldeveloper.exe");
        assert!(exe.is_file());
        let runs = h.runner.runs();
        assert!(runs[1].1.contains(&format!(
            "New-DesktopShortcut -TargetPath '{}' -Description 'Oracle SQL Developer'",
            exe.display()
        )));

        let miniconda = &runs[2].1;
        assert!(miniconda.contains("Install-Miniconda -InstallerPath '"));
        assert!(miniconda.contains("\n\nAdd-ToPath -PathToAdd 'C:\\ProgramData\\Miniconda3\\python.exe'\n"));
        assert!(miniconda.ends_with("Add-ToPath -PathToAdd 'C:\\ProgramData\\Miniconda3\\Scripts\\pip3.exe'\n"));

        let cherry = &runs[3].1;
        assert!(cherry.contains("Install-CherryTree -log '"));
        assert!(cherry.contains(&format!("-installPath '{}'", h.path("downloads").display())));

        let sql_logs: Vec<_> = fs::read_dir(h.path("logs").join("sqldeveloper"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(sql_logs.len(), 1);
        assert!(sql_logs[0].starts_with("sqldeveloper_"));

        let nirsoft_root = h.path("downloads").join("nirsoft");
        let stamped: Vec<_> = fs::read_dir(&nirsoft_root).unwrap().collect();
        assert_eq!(stamped.len(), 1);
        let exclusion = &runs[4].1;
        assert!(exclusion.starts_with(&format!("$path = '{}'\n", nirsoft_root.display())));
        assert!(h.path("logs").join("nirsoft").is_dir());
    }

    #[test]
    fn failing_install_stops_the_run() {
        let h = Harness::new().with_runner(RecordingRunner::new().failing("install-go"));
        let install = manifest(&h, &["Go", "Java"]);
        let err = run(&h.context(false), &args(install, false)).unwrap_err();

        assert!(format!("{err:#}").contains("installing Go"));
        assert_eq!(h.runner.names(), vec!["install-choco", "install-go"]);
        let failed = h.log.step_entries().into_iter().last().unwrap();
        assert_eq!(failed.name, "Go");
        assert_eq!(failed.status, StepStatus::Failed);
    }

    #[test]
    fn choco_failure_is_fatal_before_reading_manifest() {
        let h = Harness::new().with_runner(RecordingRunner::new().failing("install-choco"));
        let err = run(&h.context(false), &args(h.path("missing.yaml"), false)).unwrap_err();
        assert!(format!("{err:#}").contains("installing Chocolatey"));
    }

    #[test]
    fn missing_global_directories_are_fatal() {
        let h = Harness::new();
        let install = h.write("install.yaml", "install:\n  programs to install: [Go]\n");
        let err = run(&h.context(false), &args(install, false)).unwrap_err();
        assert!(format!("{err:#}").contains("global log directory"));
        assert_eq!(h.runner.names(), vec!["install-choco"]);
    }

    #[test]
    fn dry_run_downloads_nothing() {
        let h = Harness::new();
        let install = manifest(&h, &["SQL Developer", "NirSoft", "Go"]);
        run(&h.context(true), &args(install, true)).unwrap();

        assert!(h.fetcher.requests().is_empty());
        assert!(!h.path("downloads").exists());
        assert!(h
            .log
            .step_entries()
            .iter()
            .all(|s| s.status == StepStatus::DryRun));
    }

    #[test]
    fn defender_script_checks_before_adding() {
        let script = defender_exclusion_script(Path::new(r"C:\downloads\nirsoft"));
        insta::assert_snapshot!(script.render(), @r"
        $path = 'C:\downloads\nirsoft'
        if (-not ((Get-MpPreference).ExclusionPath -contains $path)) {
            Add-MpPreference -ExclusionPath $path
        }
        ");
    }
}
