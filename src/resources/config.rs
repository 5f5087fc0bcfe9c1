//! Construction configs, one per artifact kind.

/// Permission and ownership metadata shared by files and directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    /// Octal permission mode, e.g. `"644"`.
    pub mode: String,
    /// Owning group.
    pub group: String,
    /// Owning user.
    pub owner: String,
}

impl Ownership {
    /// Create ownership metadata.
    #[must_use]
    pub fn new(mode: impl Into<String>, group: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            group: group.into(),
            owner: owner.into(),
        }
    }
}

/// Start/end markers that delimit macros inside file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDelimiters {
    /// Opening marker, e.g. `{|`.
    pub start: String,
    /// Closing marker, e.g. `|}`.
    pub end: String,
}

impl MacroDelimiters {
    /// Create a delimiter pair.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Fields for a regular (possibly templated) file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    /// Unique artifact name.
    pub name: String,
    /// Absolute target path.
    pub path: String,
    /// Permission and ownership metadata.
    pub ownership: Ownership,
    /// Raw file contents.
    pub content: Vec<u8>,
    /// Macro delimiters; `None` disables macro scanning.
    pub delimiters: Option<MacroDelimiters>,
    /// Binary contents are never scanned for macros.
    pub is_binary: bool,
}

/// Fields for a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Unique artifact name.
    pub name: String,
    /// Absolute target path.
    pub path: String,
    /// Permission and ownership metadata.
    pub ownership: Ownership,
}

/// Fields for a symbolic link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkConfig {
    /// Unique artifact name.
    pub name: String,
    /// Absolute path of the link itself.
    pub path: String,
    /// Path the link points to.
    pub target: String,
}

/// Construction config for any artifact kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordConfig {
    /// A regular file.
    File(FileConfig),
    /// A directory.
    Directory(DirectoryConfig),
    /// A symbolic link.
    Symlink(SymlinkConfig),
}

impl RecordConfig {
    /// The artifact name carried by this config.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File(c) => &c.name,
            Self::Directory(c) => &c.name,
            Self::Symlink(c) => &c.name,
        }
    }
}

impl From<FileConfig> for RecordConfig {
    fn from(config: FileConfig) -> Self {
        Self::File(config)
    }
}

impl From<DirectoryConfig> for RecordConfig {
    fn from(config: DirectoryConfig) -> Self {
        Self::Directory(config)
    }
}

impl From<SymlinkConfig> for RecordConfig {
    fn from(config: SymlinkConfig) -> Self {
        Self::Symlink(config)
    }
}
