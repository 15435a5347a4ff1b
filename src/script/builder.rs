//! PowerShell script text built from module function calls.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A PowerShell script: an optional `Import-Module` line followed by
/// commands in the order they were added.
///
/// Argument values are always emitted as single-quoted literals, so paths
/// and patterns containing `$`, backticks or spaces reach the function
/// unexpanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerShellScript {
    module: Option<PathBuf>,
    lines: Vec<String>,
}

impl PowerShellScript {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Import the module at `path` before any command runs.
    #[must_use]
    pub fn import_module(mut self, path: &Path) -> Self {
        self.module = Some(path.to_path_buf());
        self
    }

    /// Call `function` with no arguments.
    #[must_use]
    pub fn call(self, function: &str) -> Self {
        self.line(function)
    }

    /// Call `function` with named arguments: `Fn -Name 'value' ...`.
    #[must_use]
    pub fn call_with(self, function: &str, args: &[(&str, &str)]) -> Self {
        let mut text = function.to_string();
        for (name, value) in args {
            let _ = write!(text, " -{name} {}", quote(value));
        }
        self.line(text)
    }

    /// Append a raw line.
    #[must_use]
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Append an empty line.
    #[must_use]
    pub fn blank(self) -> Self {
        self.line("")
    }

    /// Whether no command has been added. An import alone does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Non-blank command lines, without the import.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
    }

    /// The script text, newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(module) = &self.module {
            let _ = writeln!(out, "Import-Module {}", quote(&module.to_string_lossy()));
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Quote `value` as a PowerShell single-quoted string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
