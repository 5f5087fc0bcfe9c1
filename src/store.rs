//! The named collection of artifacts built during one conversion run.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, RecordError};
use crate::manifest::ManifestPatcher;
use crate::resources::helpers::fs::ensure_dir;
use crate::resources::{
    DirectoryConfig, FILES_DIR, FileConfig, FileKind, FileRecord, RecordConfig, SymlinkConfig,
    TEMPLATES_DIR,
};
use crate::tags::{MappingTable, TagMapper};

/// Module subdirectory holding manifests.
pub const MANIFESTS_DIR: &str = "manifests";

/// Extension of manifest files.
pub const MANIFEST_EXTENSION: &str = "pp";

/// One artifact written by [`ArtifactStore::export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    /// Artifact name.
    pub name: String,
    /// Target path on the managed system.
    pub path: String,
    /// Artifact kind after macro substitution.
    pub kind: FileKind,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Exported artifacts in manifest order.
    pub artifacts: Vec<ExportedArtifact>,
    /// The manifest that was patched.
    pub manifest: PathBuf,
}

impl ExportReport {
    /// Number of exported artifacts of `kind`.
    #[must_use]
    pub fn count(&self, kind: FileKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }
}

/// Artifacts keyed by name.
///
/// Adding a record whose name is already present replaces the previous one.
/// Iteration, and therefore the order of declarations in the exported
/// manifest, is ascending by name.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    entries: BTreeMap<String, FileRecord>,
    mapper: TagMapper,
}

impl ArtifactStore {
    /// Create an empty store whose file records are scanned with `mapper`.
    #[must_use]
    pub const fn new(mapper: TagMapper) -> Self {
        Self {
            entries: BTreeMap::new(),
            mapper,
        }
    }

    /// The macro mapper applied to newly added files.
    #[must_use]
    pub const fn mapper(&self) -> &TagMapper {
        &self.mapper
    }

    /// Replace the mapping table. Records already in the store keep the
    /// substitution they were built with.
    pub fn set_mapping(&mut self, table: MappingTable) {
        self.mapper.set_table(table);
    }

    /// Validate `config`, build its record, and insert it.
    ///
    /// Returns the record previously stored under the same name, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the config fails validation; the store
    /// is left unchanged.
    pub fn add(&mut self, config: impl Into<RecordConfig>) -> Result<Option<FileRecord>, RecordError> {
        let record = FileRecord::new(config.into(), &self.mapper)?;
        Ok(self.entries.insert(record.name().to_string(), record))
    }

    /// Add a regular file (or template, if its macros are rewritten).
    ///
    /// # Errors
    ///
    /// See [`ArtifactStore::add`].
    pub fn add_file(&mut self, config: FileConfig) -> Result<Option<FileRecord>, RecordError> {
        self.add(config)
    }

    /// Add a directory.
    ///
    /// # Errors
    ///
    /// See [`ArtifactStore::add`].
    pub fn add_directory(
        &mut self,
        config: DirectoryConfig,
    ) -> Result<Option<FileRecord>, RecordError> {
        self.add(config)
    }

    /// Add a symbolic link.
    ///
    /// # Errors
    ///
    /// See [`ArtifactStore::add`].
    pub fn add_symlink(&mut self, config: SymlinkConfig) -> Result<Option<FileRecord>, RecordError> {
        self.add(config)
    }

    /// Remove the record named `name`; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<FileRecord> {
        self.entries.remove(name)
    }

    /// Look up a record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.entries.get(name)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in export order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values()
    }

    /// Location of the manifest named `manifest_name` under `base`.
    #[must_use]
    pub fn manifest_path(base: &Path, manifest_name: &str) -> PathBuf {
        base.join(MANIFESTS_DIR)
            .join(format!("{manifest_name}.{MANIFEST_EXTENSION}"))
    }

    /// Write every record into the module at `base` and splice their
    /// declarations into `manifests/<manifest_name>.pp`.
    ///
    /// `files/` and `templates/` are created if missing. The first failure
    /// aborts the export; artifacts written before it stay on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CreateDir`] if an output directory cannot be
    /// created, [`ExportError::Write`] if an artifact cannot be written, or
    /// [`ExportError::Manifest`] if the manifest is missing or malformed.
    pub fn export(
        &self,
        base: &Path,
        module: &str,
        manifest_name: &str,
        parameters: &[String],
    ) -> Result<ExportReport, ExportError> {
        ensure_dir(&base.join(FILES_DIR))?;
        ensure_dir(&base.join(TEMPLATES_DIR))?;

        let mut blocks = Vec::with_capacity(self.entries.len());
        let mut artifacts = Vec::with_capacity(self.entries.len());
        for record in self.iter() {
            blocks.push(record.render(base, module)?);
            artifacts.push(ExportedArtifact {
                name: record.name().to_string(),
                path: record.path().to_string(),
                kind: record.kind(),
            });
        }

        let manifest = Self::manifest_path(base, manifest_name);
        ManifestPatcher::new(&manifest).patch(&blocks, parameters)?;
        Ok(ExportReport {
            artifacts,
            manifest,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::ManifestError;
    use crate::resources::{MacroDelimiters, Ownership};
    use crate::tags::MatchOrder;

    fn file(name: &str, path: &str, content: &str) -> FileConfig {
        FileConfig {
            name: name.to_string(),
            path: path.to_string(),
            ownership: Ownership::new("644", "root", "root"),
            content: content.as_bytes().to_vec(),
            delimiters: Some(MacroDelimiters::new("{|", "|}")),
            is_binary: false,
        }
    }

    fn module_with_manifest() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(MANIFESTS_DIR)).unwrap();
        std::fs::write(
            dir.path().join(MANIFESTS_DIR).join("init.pp"),
            "class motd {\n}\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn add_replaces_same_name() {
        let mut store = ArtifactStore::default();
        assert!(store.add_file(file("_etc_motd", "/etc/motd", "one")).unwrap().is_none());
        let previous = store.add_file(file("_etc_motd", "/etc/motd", "two")).unwrap();

        assert_eq!(previous.unwrap().content(), Some(b"one".as_slice()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("_etc_motd").unwrap().content(), Some(b"two".as_slice()));
    }

    #[test]
    fn add_invalid_config_leaves_store_unchanged() {
        let mut store = ArtifactStore::default();
        let err = store.add_file(file("x", "relative/path", "")).unwrap_err();
        assert!(matches!(err, RecordError::RelativePath { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_absent_name_is_noop() {
        let mut store = ArtifactStore::default();
        store.add_file(file("a", "/a", "")).unwrap();
        assert!(store.remove("missing").is_none());
        assert_eq!(store.len(), 1);
        assert!(store.remove("a").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn iteration_is_ordered_by_name() {
        let mut store = ArtifactStore::default();
        store.add_file(file("b", "/b", "")).unwrap();
        store
            .add_symlink(SymlinkConfig {
                name: "a".to_string(),
                path: "/a".to_string(),
                target: "/b".to_string(),
            })
            .unwrap();
        store
            .add_directory(DirectoryConfig {
                name: "c".to_string(),
                path: "/c".to_string(),
                ownership: Ownership::new("755", "root", "root"),
            })
            .unwrap();
        let names: Vec<&str> = store.iter().map(FileRecord::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn set_mapping_applies_only_to_later_records() {
        let mut store = ArtifactStore::default();
        store.add_file(file("before", "/before", "{|custom.tag|}")).unwrap();
        store.set_mapping(MappingTable::new([("custom.tag", "my_var")], MatchOrder::Declared));
        store.add_file(file("after", "/after", "{|custom.tag|}")).unwrap();

        assert_eq!(store.get("before").unwrap().kind(), FileKind::File);
        let after = store.get("after").unwrap();
        assert_eq!(after.kind(), FileKind::Template);
        assert_eq!(after.content(), Some(b"@my_var".as_slice()));
    }

    #[test]
    fn export_creates_directories_and_patches_manifest() {
        let dir = module_with_manifest();
        let mut store = ArtifactStore::default();
        store
            .add_file(file("_etc_motd", "/etc/motd", "Host: {|rhn.system.hostname|}\n"))
            .unwrap();
        store.add_file(file("_etc_issue", "/etc/issue", "plain\n")).unwrap();

        let report = store
            .export(dir.path(), "motd", "init", &[])
            .unwrap();

        assert_eq!(report.count(FileKind::Template), 1);
        assert_eq!(report.count(FileKind::File), 1);
        assert_eq!(report.manifest, dir.path().join("manifests").join("init.pp"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("templates").join("_etc_motd.tmpl")).unwrap(),
            "Host: @fqdn\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("files").join("_etc_issue")).unwrap(),
            "plain\n"
        );
        let manifest = std::fs::read_to_string(&report.manifest).unwrap();
        let issue = manifest.find("'_etc_issue'").unwrap();
        let motd = manifest.find("'_etc_motd'").unwrap();
        assert!(issue < motd);
    }

    #[test]
    fn export_without_manifest_fails_after_writing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ArtifactStore::default();
        store.add_file(file("_etc_issue", "/etc/issue", "plain\n")).unwrap();

        let err = store.export(dir.path(), "motd", "init", &[]).unwrap_err();

        assert!(matches!(err, ExportError::Manifest(ManifestError::NotFound { .. })));
        assert!(dir.path().join("files").join("_etc_issue").exists());
    }

    #[test]
    fn export_fails_when_files_dir_is_a_file() {
        let dir = module_with_manifest();
        std::fs::write(dir.path().join("files"), "in the way").unwrap();
        let store = ArtifactStore::default();

        let err = store.export(dir.path(), "motd", "init", &[]).unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));
    }

    #[test]
    fn export_twice_overwrites_manifest_body() {
        let dir = module_with_manifest();
        let mut store = ArtifactStore::default();
        store.add_file(file("first", "/first", "")).unwrap();
        store.export(dir.path(), "motd", "init", &[]).unwrap();

        store.remove("first");
        store.add_file(file("second", "/second", "")).unwrap();
        let report = store.export(dir.path(), "motd", "init", &[]).unwrap();

        let manifest = std::fs::read_to_string(report.manifest).unwrap();
        assert!(!manifest.contains("'first'"));
        assert!(manifest.contains("'second'"));
    }
}
