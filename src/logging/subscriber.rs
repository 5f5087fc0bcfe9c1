//! Tracing subscriber setup: console formatter, run log file, and
//! initialisation.
//!
//! Three targets carry structured data instead of preformatted text:
//! [`STAGE_TARGET`] for stage headers, [`RUN_TARGET`] for the channel and
//! module being converted, and [`ARTIFACT_TARGET`] for exported artifacts.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};

use super::utils::{clock, kind_style, log_file_path, started_at};
use super::{ARTIFACT_TARGET, RUN_TARGET, STAGE_TARGET};
use crate::resources::FileKind;

/// Fields this crate attaches to events.
#[derive(Default)]
struct EventFields {
    message: String,
    channel: Option<String>,
    source: Option<String>,
    module: Option<String>,
    module_dir: Option<String>,
    kind: Option<String>,
    path: Option<String>,
}

impl EventFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "channel" => Some(&mut self.channel),
            "source" => Some(&mut self.source),
            "module" => Some(&mut self.module),
            "module_dir" => Some(&mut self.module_dir),
            "kind" => Some(&mut self.kind),
            "path" => Some(&mut self.path),
            _ => None,
        }
    }

    fn field(value: Option<&String>) -> &str {
        value.map_or("?", String::as_str)
    }

    /// Kind of an artifact event, when it names a known one.
    fn artifact_kind(&self) -> Option<FileKind> {
        match self.kind.as_deref()? {
            "file" => Some(FileKind::File),
            "template" => Some(FileKind::Template),
            "directory" => Some(FileKind::Directory),
            "symlink" => Some(FileKind::Symlink),
            _ => None,
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = text;
        } else if let Some(slot) = self.slot(field.name()) {
            *slot = Some(text);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else if let Some(slot) = self.slot(field.name()) {
            *slot = Some(value.to_string());
        }
    }
}

/// Appends every event at `DEBUG` and above to the run log file as plain
/// text, independent of console verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Create the log file for `command` in the cache directory.
    ///
    /// Returns `None` if the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::create(&log_file_path(command)?, command)
    }

    /// Truncate `path` and write a one-line run header.
    pub(super) fn create(path: &Path, command: &str) -> Option<Self> {
        let version = option_env!("PUPPETIZE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        let mut file = fs::File::create(path).ok()?;
        writeln!(file, "# puppetize {version} {command} started {}", started_at()).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }

    fn line(event: &tracing::Event<'_>) -> String {
        let metadata = event.metadata();
        let fields = EventFields::of(event);
        let ts = clock();
        match metadata.target() {
            RUN_TARGET => format!(
                "# channel {} ({})\n# module  {} in {}",
                EventFields::field(fields.channel.as_ref()),
                EventFields::field(fields.source.as_ref()),
                EventFields::field(fields.module.as_ref()),
                EventFields::field(fields.module_dir.as_ref()),
            ),
            STAGE_TARGET => format!("{ts} == {}", fields.message),
            ARTIFACT_TARGET => format!(
                "{ts}    {:<9} {}",
                EventFields::field(fields.kind.as_ref()),
                EventFields::field(fields.path.as_ref()),
            ),
            _ => format!("{ts} {:<5} {}", metadata.level().as_str(), fields.message),
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = Self::line(event);
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console rendering: bold stage headers, a run banner, coloured artifact
/// rows, indented info, dim debug, and labelled warnings and errors.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let fields = EventFields::of(event);

        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => writeln!(writer, "\x1b[31merror:\x1b[0m {}", fields.message),
            (tracing::Level::WARN, _) => writeln!(writer, "\x1b[33mwarning:\x1b[0m {}", fields.message),
            (_, RUN_TARGET) => writeln!(
                writer,
                "\x1b[1m{}\x1b[0m \x1b[2m->\x1b[0m \x1b[1m{}\x1b[0m",
                EventFields::field(fields.channel.as_ref()),
                EventFields::field(fields.module.as_ref()),
            ),
            (_, STAGE_TARGET) => writeln!(writer, "\x1b[1;34m::\x1b[0m \x1b[1m{}\x1b[0m", fields.message),
            (_, ARTIFACT_TARGET) => {
                let path = EventFields::field(fields.path.as_ref());
                match fields.artifact_kind() {
                    Some(kind) => {
                        let (icon, colour) = kind_style(kind);
                        writeln!(writer, "  {colour}{icon} {path}\x1b[0m \x1b[2m{kind}\x1b[0m")
                    }
                    None => writeln!(writer, "  {path}"),
                }
            }
            (tracing::Level::INFO, _) => writeln!(writer, "  {}", fields.message),
            _ => writeln!(writer, "  \x1b[2m{}\x1b[0m", fields.message),
        }
    }
}

/// Install the global subscriber: console output (warnings and errors on
/// stderr, the rest on stdout; `DEBUG` only when `verbose`) plus the run log
/// for `command`, which always records `DEBUG` and above.
///
/// Call once, before the first log call.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(tracing::Level::WARN)
                .and(std::io::stdout.with_min_level(tracing::Level::INFO)),
        )
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG)))
        .init();
}
