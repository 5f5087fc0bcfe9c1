//! File-system helpers used while exporting artifacts.
use std::path::Path;

use crate::resources::error::ExportError;

/// Create `path` (and any ancestors) if it does not exist yet.
///
/// # Errors
///
/// Returns [`ExportError::CreateDir`] if the directory cannot be created,
/// including when a non-directory already occupies `path`.
pub fn ensure_dir(path: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(path).map_err(|source| ExportError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `bytes` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError::Write`] if the file cannot be created or written.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("files");
        ensure_dir(&files).unwrap();
        ensure_dir(&files).unwrap();
        assert!(files.is_dir());
    }

    #[test]
    fn ensure_dir_fails_when_file_is_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("files");
        std::fs::write(&blocker, "not a dir").unwrap();
        let err = ensure_dir(&blocker).unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));
    }

    #[test]
    fn write_file_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        write_file(&file, b"first").unwrap();
        write_file(&file, b"second").unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), b"second");
    }

    #[test]
    fn write_file_fails_without_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing").join("out");
        let err = write_file(&file, b"x").unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
