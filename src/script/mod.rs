//! PowerShell scripts: building the text and running it.
pub mod builder;
pub mod runner;

pub use builder::{PowerShellScript, quote};
pub use runner::{DryRunRunner, POWERSHELL, PowerShellRunner, ScriptRunner};

/// Shared test helpers for code that runs scripts.
#[cfg(test)]
pub mod test_helpers {
    use super::{PowerShellScript, ScriptRunner};
    use crate::error::ScriptError;
    use std::sync::Mutex;

    /// Records every script it is asked to run. Scripts whose name is in
    /// `failing` fail with exit code 1.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        runs: Mutex<Vec<(String, String)>>,
        failing: Vec<String>,
    }

    impl RecordingRunner {
        /// Create a runner on which every script succeeds.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the script called `name` fail.
        #[must_use]
        pub fn failing(mut self, name: &str) -> Self {
            self.failing.push(name.to_string());
            self
        }

        /// `(name, rendered text)` of every run, in order.
        #[must_use]
        pub fn runs(&self) -> Vec<(String, String)> {
            self.runs.lock().map_or_else(|_| vec![], |g| g.clone())
        }

        /// Names of every run, in order.
        #[must_use]
        pub fn names(&self) -> Vec<String> {
            self.runs().into_iter().map(|(name, _)| name).collect()
        }
    }

    impl ScriptRunner for RecordingRunner {
        fn run(&self, name: &str, script: &PowerShellScript) -> Result<(), ScriptError> {
            if let Ok(mut runs) = self.runs.lock() {
                runs.push((name.to_string(), script.render()));
            }
            if self.failing.iter().any(|f| f == name) {
                return Err(ScriptError::Failed {
                    name: name.to_string(),
                    code: 1,
                });
            }
            Ok(())
        }
    }
}
