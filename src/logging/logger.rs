//! The logging facade used by commands, with the export summary.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::utils::log_file_path;
use super::{ARTIFACT_TARGET, RUN_TARGET, STAGE_TARGET};
use crate::resources::FileKind;

/// One exported artifact, recorded for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    /// Artifact name.
    pub name: String,
    /// Artifact kind.
    pub kind: FileKind,
    /// Target path on the managed system.
    pub path: String,
}

/// Logging facade for one command run.
///
/// Messages become [`tracing`] events; exported artifacts are also kept
/// here until [`print_summary`](Self::print_summary) lists them.
#[derive(Debug)]
pub struct Logger {
    artifacts: Mutex<Vec<ArtifactEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create the logger for `command`.
    ///
    /// Only the run log's location is resolved here, for the summary; the
    /// file itself is opened by [`init_subscriber`](super::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::writing_to(log_file_path(command))
    }

    pub(super) const fn writing_to(log_file: Option<PathBuf>) -> Self {
        Self {
            artifacts: Mutex::new(Vec::new()),
            log_file,
        }
    }

    #[cfg(test)]
    pub(crate) fn artifact_entries(&self) -> Vec<ArtifactEntry> {
        self.artifacts.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log a fatal error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message; shown on the console only when verbose.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Announce which channel is being converted into which module.
    ///
    /// The run log records this as its header block.
    pub fn begin(&self, channel: &str, source: &Path, module: &str, module_dir: &Path) {
        tracing::info!(
            target: RUN_TARGET,
            channel,
            source = %source.display(),
            module,
            module_dir = %module_dir.display(),
            "converting"
        );
    }

    /// Record an exported artifact for the summary.
    pub fn record_artifact(&self, name: &str, kind: FileKind, path: &str) {
        if let Ok(mut guard) = self.artifacts.lock() {
            guard.push(ArtifactEntry {
                name: name.to_string(),
                kind,
                path: path.to_string(),
            });
        }
    }

    /// Number of recorded artifacts of `kind`.
    #[must_use]
    pub fn count(&self, kind: FileKind) -> usize {
        self.artifacts
            .lock()
            .map_or(0, |guard| guard.iter().filter(|a| a.kind == kind).count())
    }

    /// List every recorded artifact, then the per-kind totals and the log
    /// location. Prints nothing when no artifact was recorded.
    pub fn print_summary(&self) {
        let artifacts = match self.artifacts.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if artifacts.is_empty() {
            return;
        }

        self.stage("Summary");
        for artifact in &artifacts {
            tracing::info!(
                target: ARTIFACT_TARGET,
                kind = %artifact.kind,
                path = artifact.path.as_str(),
                "{}",
                artifact.name
            );
        }
        self.info(&format!(
            "{} artifacts: {} files, {} templates, {} directories, {} symlinks",
            artifacts.len(),
            self.count(FileKind::File),
            self.count(FileKind::Template),
            self.count(FileKind::Directory),
            self.count(FileKind::Symlink),
        ));
        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::capture_logger;

    fn log_text(log: &Logger) -> String {
        std::fs::read_to_string(log.log_file.as_ref().expect("log path")).unwrap()
    }

    #[test]
    fn run_log_starts_with_header() {
        let (log, _tmp, _guard) = capture_logger();
        assert!(log_text(&log).starts_with("# puppetize "));
        assert!(log_text(&log).lines().next().unwrap().contains(" convert started "));
    }

    #[test]
    fn begin_records_channel_and_module() {
        let (log, _tmp, _guard) = capture_logger();
        log.begin(
            "MOTD Files",
            Path::new("/srv/export/motd.json"),
            "acmecorp-motd_files",
            Path::new("/srv/build/acmecorp-motd_files"),
        );
        let text = log_text(&log);
        assert!(text.contains("# channel MOTD Files (/srv/export/motd.json)\n"));
        assert!(text.contains("# module  acmecorp-motd_files in /srv/build/acmecorp-motd_files\n"));
    }

    #[test]
    fn levels_are_labelled_in_run_log() {
        let (log, _tmp, _guard) = capture_logger();
        log.debug("added /etc/motd");
        log.warn("/etc/motd listed more than once");
        log.error("exporting acmecorp-motd_files");
        let text = log_text(&log);
        assert!(text.contains(" DEBUG added /etc/motd\n"));
        assert!(text.contains(" WARN  /etc/motd listed more than once\n"));
        assert!(text.contains(" ERROR exporting acmecorp-motd_files\n"));
    }

    #[test]
    fn stage_is_marked_in_run_log() {
        let (log, _tmp, _guard) = capture_logger();
        log.stage("Exporting module");
        assert!(log_text(&log).contains(" == Exporting module\n"));
    }

    #[test]
    fn record_artifact_keeps_order_and_counts() {
        let (log, _tmp, _guard) = capture_logger();
        log.record_artifact("_etc_b", FileKind::Template, "/etc/b");
        log.record_artifact("_etc_a", FileKind::File, "/etc/a");
        log.record_artifact("_etc_c", FileKind::File, "/etc/c");
        let entries = log.artifact_entries();
        assert_eq!(entries[0].name, "_etc_b");
        assert_eq!(entries[1].path, "/etc/a");
        assert_eq!(log.count(FileKind::File), 2);
        assert_eq!(log.count(FileKind::Template), 1);
        assert_eq!(log.count(FileKind::Symlink), 0);
    }

    #[test]
    fn summary_lists_artifacts_and_totals() {
        let (log, _tmp, _guard) = capture_logger();
        log.record_artifact("_etc_motd", FileKind::Template, "/etc/motd");
        log.record_artifact("_etc_motd.d", FileKind::Directory, "/etc/motd.d");
        log.print_summary();
        let text = log_text(&log);
        assert!(text.contains(" == Summary\n"));
        assert!(text.contains("template  /etc/motd\n"));
        assert!(text.contains("directory /etc/motd.d\n"));
        assert!(text.contains("2 artifacts: 0 files, 1 templates, 1 directories, 0 symlinks"));
        assert!(text.contains("log: "));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn empty_summary_prints_nothing() {
        let (log, _tmp, _guard) = capture_logger();
        log.print_summary();
        assert!(!log_text(&log).contains("Summary"));
    }
}
