//! Console and run-log output for conversions.
//!
//! [`Logger`] is the only entry point commands use; it emits [`tracing`]
//! events that [`init_subscriber`] routes to the terminal and to
//! `$XDG_CACHE_HOME/puppetize/<command>.log`.

mod logger;
mod subscriber;
mod utils;

pub use logger::{ArtifactEntry, Logger};
pub use subscriber::init_subscriber;

/// Target of stage header events.
pub(crate) const STAGE_TARGET: &str = "puppetize::stage";

/// Target of the event naming the channel and module of a conversion.
pub(crate) const RUN_TARGET: &str = "puppetize::run";

/// Target of per-artifact summary events.
pub(crate) const ARTIFACT_TARGET: &str = "puppetize::artifact";

/// A [`Logger`] whose events go to a fresh log file in a temporary
/// directory, through a thread-local dispatcher.
///
/// Keep all three values alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn capture_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("convert.log");
    let layer = subscriber::FileLayer::create(&path, "convert").expect("log file");
    let dispatch = tracing::Dispatch::new(
        tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG)),
    );
    let guard = tracing::dispatcher::set_default(&dispatch);
    (Logger::writing_to(Some(path)), tmp, guard)
}
