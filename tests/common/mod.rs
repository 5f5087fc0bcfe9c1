// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace and a fluent builder so
// each integration test can lay out channel exports, configuration, and
// pre-existing modules without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use puppetize_cli::resources::{
    DirectoryConfig, FileConfig, MacroDelimiters, Ownership, SymlinkConfig,
};

/// Channel export used by the end-to-end tests: one template, one plain
/// file, one binary file, a directory, a symlink, and an unsupported entry.
pub const MOTD_CHANNEL: &str = r#"{
    "org_name": "Acme Corp",
    "channel_name": "MOTD Files",
    "files": [
        {
            "path": "/etc/motd",
            "type": "file",
            "contents": "Welcome to {|rhn.system.hostname|}\n",
            "contents_enc64": false,
            "permissions_mode": 644,
            "group": "root",
            "owner": "root",
            "macro-start-delimiter": "{|",
            "macro-end-delimiter": "|}"
        },
        {
            "path": "/etc/issue",
            "type": "file",
            "contents": "Authorized use only\n",
            "contents_enc64": false,
            "permissions_mode": 644,
            "group": "root",
            "owner": "root",
            "macro-start-delimiter": "{|",
            "macro-end-delimiter": "|}"
        },
        {
            "path": "/usr/share/motd/logo.bin",
            "type": "file",
            "contents": "e3xyaG4uc3lzdGVtLmhvc3RuYW1lfH0=",
            "contents_enc64": true,
            "permissions_mode": "0600",
            "group": "root",
            "owner": "root",
            "macro-start-delimiter": "{|",
            "macro-end-delimiter": "|}"
        },
        {
            "path": "/etc/motd.d",
            "type": "directory",
            "permissions_mode": 755,
            "group": "root",
            "owner": "root"
        },
        {
            "path": "/etc/issue.net",
            "type": "symlink",
            "target_path": "/etc/issue"
        },
        {
            "path": "/dev/motd-pipe",
            "type": "fifo"
        }
    ]
}"#;

/// Module directory name derived from [`MOTD_CHANNEL`].
pub const MOTD_MODULE: &str = "acmecorp-motd_files";

/// Class name derived from [`MOTD_CHANNEL`].
pub const MOTD_CLASS: &str = "motd_files";

/// Config for a text file owned by root with `{|`/`|}` delimiters.
pub fn text_file(path: &str, content: &str) -> FileConfig {
    FileConfig {
        name: path.replace('/', "_"),
        path: path.to_string(),
        ownership: Ownership::new("644", "root", "root"),
        content: content.as_bytes().to_vec(),
        delimiters: Some(MacroDelimiters::new("{|", "|}")),
        is_binary: false,
    }
}

/// Config for a directory owned by root.
pub fn directory(path: &str) -> DirectoryConfig {
    DirectoryConfig {
        name: path.replace('/', "_"),
        path: path.to_string(),
        ownership: Ownership::new("755", "root", "root"),
    }
}

/// Config for a symlink.
pub fn symlink(path: &str, target: &str) -> SymlinkConfig {
    SymlinkConfig {
        name: path.replace('/', "_"),
        path: path.to_string(),
        target: target.to_string(),
    }
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct Workspace {
    /// Temporary directory holding inputs and generated modules.
    pub root: tempfile::TempDir,
}

impl Workspace {
    /// Path to the workspace root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of a file or directory relative to the workspace root.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Read a file relative to the workspace root.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Read raw bytes relative to the workspace root.
    pub fn read_bytes(&self, relative: &str) -> Vec<u8> {
        std::fs::read(self.join(relative)).unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }
}

/// Fluent builder for [`Workspace`].
pub struct WorkspaceBuilder {
    ws: Workspace,
}

impl WorkspaceBuilder {
    /// Begin building an empty workspace.
    pub fn new() -> Self {
        Self {
            ws: Workspace {
                root: tempfile::tempdir().expect("create temp dir"),
            },
        }
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.ws.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture file");
        self
    }

    /// Write `manifests/<name>.pp` inside `module_dir`.
    pub fn with_manifest(self, module_dir: &str, name: &str, content: &str) -> Self {
        self.with_file(&format!("{module_dir}/manifests/{name}.pp"), content)
    }

    /// Write the channel export to `channel.json`.
    pub fn with_channel(self, json: &str) -> Self {
        self.with_file("channel.json", json)
    }

    /// Write the tool configuration to `puppetize.toml`.
    pub fn with_config(self, toml: &str) -> Self {
        self.with_file("puppetize.toml", toml)
    }

    /// Finish building and return the workspace.
    pub fn build(self) -> Workspace {
        self.ws
    }
}
