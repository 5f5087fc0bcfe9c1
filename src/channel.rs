//! Configuration channel exports: the JSON document describing one channel
//! and its files, as produced by the source system's API.
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::error::{ConfigError, RecordError};
use crate::naming::{ModuleNames, artifact_name};
use crate::resources::{
    DirectoryConfig, FileConfig, MacroDelimiters, Ownership, RecordConfig, SymlinkConfig,
};

/// A configuration channel and its files.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelExport {
    /// Name of the organisation owning the channel.
    pub org_name: String,
    /// Human-readable channel name.
    pub channel_name: String,
    /// Files, directories, and symlinks in the channel.
    #[serde(default)]
    pub files: Vec<ChannelFile>,
}

impl ChannelExport {
    /// Parse a channel export from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] if the text does not describe a
    /// channel.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Load a channel export from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Module, class, and user names for this channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidModuleName`] if no valid name can be
    /// derived.
    pub fn names(&self) -> Result<ModuleNames, ConfigError> {
        ModuleNames::derive(&self.org_name, &self.channel_name)
    }
}

/// Kind of a channel entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelFileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Anything else; skipped during conversion.
    #[serde(other)]
    Unsupported,
}

/// Permission mode as exported: either a number like `644` or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PermissionMode {
    /// Numeric form, whose decimal digits are the octal mode.
    Number(u32),
    /// Textual form.
    Text(String),
}

impl Default for PermissionMode {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl PermissionMode {
    /// The mode as the digit string emitted into the manifest.
    #[must_use]
    pub fn as_digits(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// One entry of a channel export.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelFile {
    /// Absolute target path.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub file_type: ChannelFileType,
    /// File contents, base64 encoded when `contents_enc64` is set.
    #[serde(default)]
    pub contents: Option<String>,
    /// Whether `contents` is base64 encoded (binary).
    #[serde(default)]
    pub contents_enc64: bool,
    /// Permission mode.
    #[serde(default)]
    pub permissions_mode: PermissionMode,
    /// Owning group.
    #[serde(default)]
    pub group: String,
    /// Owning user.
    #[serde(default)]
    pub owner: String,
    /// Macro start delimiter.
    #[serde(default, rename = "macro-start-delimiter")]
    pub macro_start_delimiter: Option<String>,
    /// Macro end delimiter.
    #[serde(default, rename = "macro-end-delimiter")]
    pub macro_end_delimiter: Option<String>,
    /// Link target, for symlinks.
    #[serde(default)]
    pub target_path: Option<String>,
}

impl ChannelFile {
    /// Build the artifact config for this entry.
    ///
    /// Base64 contents are decoded and marked binary, and their delimiters
    /// are dropped. Returns `Ok(None)` for unsupported entry kinds.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidBase64`] if encoded contents cannot be
    /// decoded.
    pub fn to_config(&self) -> Result<Option<RecordConfig>, RecordError> {
        let name = artifact_name(&self.path);
        let ownership = || {
            Ownership::new(
                self.permissions_mode.as_digits(),
                self.group.clone(),
                self.owner.clone(),
            )
        };

        let config = match self.file_type {
            ChannelFileType::File => {
                let raw = self.contents.as_deref().unwrap_or_default();
                let (content, delimiters) = if self.contents_enc64 {
                    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                    let decoded = STANDARD
                        .decode(compact)
                        .map_err(|source| RecordError::InvalidBase64 {
                            name: name.clone(),
                            source,
                        })?;
                    (decoded, None)
                } else {
                    (raw.as_bytes().to_vec(), self.delimiters())
                };
                RecordConfig::File(FileConfig {
                    name,
                    path: self.path.clone(),
                    ownership: ownership(),
                    content,
                    delimiters,
                    is_binary: self.contents_enc64,
                })
            }
            ChannelFileType::Directory => RecordConfig::Directory(DirectoryConfig {
                name,
                path: self.path.clone(),
                ownership: ownership(),
            }),
            ChannelFileType::Symlink => RecordConfig::Symlink(SymlinkConfig {
                name,
                path: self.path.clone(),
                target: self.target_path.clone().unwrap_or_default(),
            }),
            ChannelFileType::Unsupported => return Ok(None),
        };
        Ok(Some(config))
    }

    fn delimiters(&self) -> Option<MacroDelimiters> {
        match (&self.macro_start_delimiter, &self.macro_end_delimiter) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some(MacroDelimiters::new(start.as_str(), end.as_str()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "org_name": "Acme Corp",
        "channel_name": "web-servers",
        "files": [
            {
                "path": "/etc/motd",
                "type": "file",
                "contents": "Welcome to {| rhn.system.hostname |}\n",
                "contents_enc64": false,
                "permissions_mode": 644,
                "group": "root",
                "owner": "root",
                "macro-start-delimiter": "{|",
                "macro-end-delimiter": "|}"
            },
            {
                "path": "/usr/share/logo.png",
                "type": "file",
                "contents": "iVBO\nRw0K",
                "contents_enc64": true,
                "permissions_mode": "0600",
                "group": "root",
                "owner": "root",
                "macro-start-delimiter": "{|",
                "macro-end-delimiter": "|}"
            },
            {
                "path": "/etc/httpd",
                "type": "directory",
                "permissions_mode": 755,
                "group": "apache",
                "owner": "root"
            },
            {
                "path": "/etc/localtime",
                "type": "symlink",
                "target_path": "/usr/share/zoneinfo/UTC"
            },
            {
                "path": "/dev/weird",
                "type": "fifo"
            }
        ]
    }"#;

    fn export() -> ChannelExport {
        ChannelExport::from_json_str(EXPORT).unwrap()
    }

    #[test]
    fn parses_channel_metadata() {
        let export = export();
        assert_eq!(export.org_name, "Acme Corp");
        assert_eq!(export.files.len(), 5);
        assert_eq!(export.names().unwrap().module(), "acmecorp-web_servers");
    }

    #[test]
    fn text_file_keeps_delimiters() {
        let config = export().files[0].to_config().unwrap().unwrap();
        let RecordConfig::File(file) = config else {
            panic!("expected a file config");
        };
        assert_eq!(file.name, "_etc_motd");
        assert_eq!(file.ownership.mode, "644");
        assert!(!file.is_binary);
        assert_eq!(file.delimiters, Some(MacroDelimiters::new("{|", "|}")));
    }

    #[test]
    fn base64_file_is_decoded_binary_without_delimiters() {
        let config = export().files[1].to_config().unwrap().unwrap();
        let RecordConfig::File(file) = config else {
            panic!("expected a file config");
        };
        assert!(file.is_binary);
        assert_eq!(file.delimiters, None);
        assert_eq!(file.content, b"\x89PNG\r\n\x1a\n");
        assert_eq!(file.ownership.mode, "0600");
    }

    #[test]
    fn directory_and_symlink_configs() {
        let export = export();
        let dir = export.files[2].to_config().unwrap().unwrap();
        assert!(matches!(dir, RecordConfig::Directory(ref d) if d.ownership.group == "apache"));
        let link = export.files[3].to_config().unwrap().unwrap();
        assert!(
            matches!(link, RecordConfig::Symlink(ref s) if s.target == "/usr/share/zoneinfo/UTC")
        );
    }

    #[test]
    fn unsupported_type_is_skipped() {
        assert!(export().files[4].to_config().unwrap().is_none());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let json = r#"{"path": "/bin/x", "type": "file", "contents": "@@@", "contents_enc64": true}"#;
        let file: ChannelFile = serde_json::from_str(json).unwrap();
        let err = file.to_config().unwrap_err();
        assert!(matches!(err, RecordError::InvalidBase64 { ref name, .. } if name == "_bin_x"));
    }

    #[test]
    fn missing_contents_become_empty() {
        let json = r#"{"path": "/etc/empty", "type": "file", "permissions_mode": 644}"#;
        let file: ChannelFile = serde_json::from_str(json).unwrap();
        let RecordConfig::File(config) = file.to_config().unwrap().unwrap() else {
            panic!("expected a file config");
        };
        assert!(config.content.is_empty());
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = ChannelExport::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson { .. }));
    }
}
