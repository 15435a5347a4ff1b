//! Logging infrastructure for structured console and file output.

mod app_log;
mod logger;
mod subscriber;
mod types;
mod utils;

pub use app_log::AppLog;
pub use logger::Logger;
pub use subscriber::{FileLayer, init_subscriber};
pub use types::{Log, StepEntry, StepStatus};
pub use utils::default_log_path;

/// Create a Logger backed by an isolated per-thread tracing subscriber with
/// a [`FileLayer`] writing into a temp directory, so that events emitted by
/// logger methods reach a file the test can read.
///
/// Keep the returned guard alive for the duration of the test; dropping it
/// restores the previous thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = FileLayer::open(&path, "test").expect("failed to create file layer");
    let log = Logger::new(Some(path));
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
