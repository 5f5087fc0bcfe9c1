//! Log file location, timestamps, and per-kind presentation.
use std::ffi::OsString;
use std::path::PathBuf;

use crate::resources::FileKind;

/// Directory under the cache root that holds run logs.
const LOG_DIR_NAME: &str = "puppetize";

/// Resolve the log directory from `XDG_CACHE_HOME` and `HOME` values.
///
/// An empty `XDG_CACHE_HOME` counts as unset. Falls back to `./.cache` when
/// neither variable is usable.
pub(super) fn log_dir_from(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let cache_root = xdg_cache_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"));
    cache_root.join(LOG_DIR_NAME)
}

/// Path of the log file for `command`, creating its directory.
///
/// Returns `None` when the directory cannot be created; logging then stays
/// console-only.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = log_dir_from(
        std::env::var_os("XDG_CACHE_HOME"),
        std::env::var_os("HOME"),
    );
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time as `HH:MM:SS`, prefixed to every log file line.
pub(super) fn clock() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

/// Current UTC date and time in RFC 3339 form, used in the run header.
pub(super) fn started_at() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Summary icon and ANSI colour for an artifact kind.
pub(super) const fn kind_style(kind: FileKind) -> (&'static str, &'static str) {
    match kind {
        FileKind::File => ("·", "\x1b[37m"),
        FileKind::Template => ("✎", "\x1b[36m"),
        FileKind::Directory => ("▸", "\x1b[34m"),
        FileKind::Symlink => ("→", "\x1b[35m"),
    }
}
