//! Core logging types: step entries, status, and the [`Log`] trait.

/// Outcome of one pipeline step, kept for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    /// Human-readable step name (a program label, an extension id, ...).
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Optional detail (skip reason, error text).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully.
    Ok,
    /// Step was skipped (setting absent, already done, tool missing).
    Skipped,
    /// Step ran in dry-run mode; nothing was changed.
    DryRun,
    /// Step failed but the program carried on.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`; tests can
/// supply a recording implementation.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a confirmation that a step succeeded.
    fn success(&self, msg: &str);
    /// Log a debug message (console only when verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log an action that would have been taken outside dry-run mode.
    fn dry_run(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn step_status_equality() {
        assert_eq!(StepStatus::Ok, StepStatus::Ok);
        assert_ne!(StepStatus::Ok, StepStatus::Failed);
        assert_ne!(StepStatus::Skipped, StepStatus::DryRun);
    }

    #[test]
    fn step_entry_clone() {
        let entry = StepEntry {
            name: "Go".to_string(),
            status: StepStatus::Skipped,
            message: Some("already installed".to_string()),
        };
        assert_eq!(entry.clone(), entry);
    }
}
