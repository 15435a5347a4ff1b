//! Per-app log file for a single install step.
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::types::{Log, StepStatus};
use super::utils::{format_local_datetime, format_local_time, strip_ansi};

/// Implement the display methods of [`Log`] by forwarding each message to
/// `self.inner` and appending it to the app's file under `$tag`.
macro_rules! tee_log_methods {
    ($($method:ident => $tag:literal),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.inner.$method(msg);
                self.append($tag, msg);
            }
        )+
    };
}

/// A [`Log`] that mirrors everything into an app-specific file while still
/// reaching the run log and console through the wrapped logger.
///
/// `install-things` uses one per installer that has a per-app log
/// directory configured, so each app's history can be read on its own.
pub struct AppLog {
    inner: Arc<dyn Log>,
    path: PathBuf,
    file: Mutex<fs::File>,
}

impl std::fmt::Debug for AppLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLog")
            .field("inner", &"<dyn Log>")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl AppLog {
    /// Open `path` for appending (creating it and its parent directory) and
    /// write a header naming `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be opened or written.
    pub fn open(inner: Arc<dyn Log>, path: &Path, app: &str) -> std::io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "==> {app} {}", format_local_datetime())?;
        Ok(Self {
            inner,
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Path of the app's log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, tag: &str, msg: &str) {
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{}] {tag}{}", format_local_time(), strip_ansi(msg)).ok();
        }
    }
}

impl Log for AppLog {
    tee_log_methods! {
        stage   => "==> ",
        info    => "",
        success => "[ok] ",
        debug   => "[debug] ",
        warn    => "[warn] ",
        error   => "[error] ",
        dry_run => "[dry run] ",
    }

    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        self.inner.record_step(name, status, message);
    }
}
