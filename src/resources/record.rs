//! A single module artifact: file, template, directory, or symlink.
use std::fmt;
use std::path::Path;

use super::config::{DirectoryConfig, FileConfig, Ownership, RecordConfig, SymlinkConfig};
use super::dsl::{ResourceBlock, quote};
use super::error::{ExportError, RecordError};
use super::helpers::fs::write_file;
use super::{FILES_DIR, TEMPLATES_DIR, TEMPLATE_EXTENSION, flatten_path};
use crate::tags::TagMapper;

/// Scheme prefix for `source =>` references into a module's `files/`.
pub const MODULE_SCHEME: &str = "puppet";

/// The kind of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    /// Regular file copied verbatim into `files/`.
    File,
    /// File whose macros were rewritten; stored under `templates/`.
    Template,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::File => "file",
            Self::Template => "template",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
        };
        f.write_str(s)
    }
}

/// Kind-specific payload of a [`FileRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Artifact {
    File { content: Vec<u8>, ownership: Ownership },
    Template { content: String, ownership: Ownership },
    Directory { ownership: Ownership },
    Symlink { target: String },
}

/// One artifact to be written into the module.
///
/// Identity is the name: two records are equal iff their names are equal.
#[derive(Debug, Clone)]
pub struct FileRecord {
    name: String,
    path: String,
    artifact: Artifact,
}

impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FileRecord {}

impl FileRecord {
    /// Validate `config` and build the record.
    ///
    /// Non-binary file contents are scanned for macros with `mapper`; if any
    /// region is rewritten the record becomes a [`FileKind::Template`].
    /// Binary contents, contents without delimiters, and contents that are
    /// not valid UTF-8 stay a plain [`FileKind::File`].
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if a required field is empty, the path is
    /// not absolute, or the mode is not octal.
    pub fn new(config: RecordConfig, mapper: &TagMapper) -> Result<Self, RecordError> {
        match config {
            RecordConfig::File(c) => Self::file(c, mapper),
            RecordConfig::Directory(c) => Self::directory(c),
            RecordConfig::Symlink(c) => Self::symlink(c),
        }
    }

    fn file(config: FileConfig, mapper: &TagMapper) -> Result<Self, RecordError> {
        let FileConfig {
            name,
            path,
            ownership,
            content,
            delimiters,
            is_binary,
        } = config;
        validate_identity(&name, &path)?;
        validate_ownership(&name, &ownership)?;

        let template = match (&delimiters, is_binary) {
            (Some(d), false) if !content.is_empty() => std::str::from_utf8(&content)
                .ok()
                .map(|text| mapper.substitute(text, &d.start, &d.end))
                .and_then(|(replaced, text)| replaced.then_some(text)),
            _ => None,
        };

        let artifact = match template {
            Some(content) => Artifact::Template { content, ownership },
            None => Artifact::File { content, ownership },
        };
        Ok(Self {
            name,
            path,
            artifact,
        })
    }

    fn directory(config: DirectoryConfig) -> Result<Self, RecordError> {
        validate_identity(&config.name, &config.path)?;
        validate_ownership(&config.name, &config.ownership)?;
        Ok(Self {
            name: config.name,
            path: config.path,
            artifact: Artifact::Directory {
                ownership: config.ownership,
            },
        })
    }

    fn symlink(config: SymlinkConfig) -> Result<Self, RecordError> {
        validate_identity(&config.name, &config.path)?;
        if config.target.trim().is_empty() {
            return Err(RecordError::MissingField {
                name: config.name,
                field: "target",
            });
        }
        Ok(Self {
            name: config.name,
            path: config.path,
            artifact: Artifact::Symlink {
                target: config.target,
            },
        })
    }

    /// Unique artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute target path on the managed system.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The artifact's kind.
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        match self.artifact {
            Artifact::File { .. } => FileKind::File,
            Artifact::Template { .. } => FileKind::Template,
            Artifact::Directory { .. } => FileKind::Directory,
            Artifact::Symlink { .. } => FileKind::Symlink,
        }
    }

    /// Contents for files and templates; `None` for directories and symlinks.
    #[must_use]
    pub fn content(&self) -> Option<&[u8]> {
        match &self.artifact {
            Artifact::File { content, .. } => Some(content.as_slice()),
            Artifact::Template { content, .. } => Some(content.as_bytes()),
            Artifact::Directory { .. } | Artifact::Symlink { .. } => None,
        }
    }

    /// Ownership metadata; `None` for symlinks.
    #[must_use]
    pub const fn ownership(&self) -> Option<&Ownership> {
        match &self.artifact {
            Artifact::File { ownership, .. }
            | Artifact::Template { ownership, .. }
            | Artifact::Directory { ownership } => Some(ownership),
            Artifact::Symlink { .. } => None,
        }
    }

    /// Link target; `Some` only for symlinks.
    #[must_use]
    pub fn link_target(&self) -> Option<&str> {
        match &self.artifact {
            Artifact::Symlink { target } => Some(target.as_str()),
            _ => None,
        }
    }

    /// The target path with separators replaced by underscores.
    #[must_use]
    pub fn flattened_path(&self) -> String {
        flatten_path(&self.path)
    }

    /// Write the artifact's bytes under `base` (files and templates only) and
    /// return its Puppet resource declaration.
    ///
    /// `module` is the module name used in `source`/`template` references.
    /// The `files/` and `templates/` directories must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Write`] if the contents cannot be written.
    pub fn render(&self, base: &Path, module: &str) -> Result<String, ExportError> {
        let flat = self.flattened_path();
        let block = ResourceBlock::new("file", self.name.as_str());

        let block = match &self.artifact {
            Artifact::File { content, ownership } => {
                write_file(&base.join(FILES_DIR).join(&flat), content)?;
                with_ownership(
                    block
                        .quoted("ensure", "file")
                        .quoted("path", self.path.as_str())
                        .quoted("source", format!("{MODULE_SCHEME}://modules/{module}/{flat}")),
                    ownership,
                )
            }
            Artifact::Template { content, ownership } => {
                let file_name = format!("{flat}.{TEMPLATE_EXTENSION}");
                write_file(&base.join(TEMPLATES_DIR).join(&file_name), content.as_bytes())?;
                let reference = quote(&format!("{module}/{file_name}"));
                with_ownership(
                    block
                        .quoted("ensure", "file")
                        .quoted("path", self.path.as_str())
                        .expr("content", format!("template({reference})")),
                    ownership,
                )
            }
            Artifact::Directory { ownership } => with_ownership(
                block
                    .quoted("ensure", "directory")
                    .quoted("path", self.path.as_str()),
                ownership,
            ),
            Artifact::Symlink { target } => block
                .quoted("ensure", "link")
                .quoted("path", self.path.as_str())
                .quoted("target", target.as_str()),
        };

        Ok(block.render())
    }
}

fn with_ownership(block: ResourceBlock, ownership: &Ownership) -> ResourceBlock {
    block
        .quoted("group", ownership.group.as_str())
        .quoted("owner", ownership.owner.as_str())
        .quoted("mode", ownership.mode.as_str())
}

fn validate_identity(name: &str, path: &str) -> Result<(), RecordError> {
    if name.is_empty() {
        return Err(RecordError::EmptyName {
            path: path.to_string(),
        });
    }
    if !path.starts_with('/') {
        return Err(RecordError::RelativePath {
            name: name.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}

fn validate_ownership(name: &str, ownership: &Ownership) -> Result<(), RecordError> {
    let missing = |field| RecordError::MissingField {
        name: name.to_string(),
        field,
    };
    if ownership.group.trim().is_empty() {
        return Err(missing("group"));
    }
    if ownership.owner.trim().is_empty() {
        return Err(missing("owner"));
    }
    let mode = &ownership.mode;
    if mode.is_empty() || mode.len() > 4 || !mode.chars().all(|c| ('0'..='7').contains(&c)) {
        return Err(RecordError::InvalidMode {
            name: name.to_string(),
            mode: mode.clone(),
        });
    }
    Ok(())
}
