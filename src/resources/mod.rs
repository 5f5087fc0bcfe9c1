//! Module artifacts: construction configs, validation, and rendering to disk
//! plus Puppet resource declarations.
pub mod config;
pub mod dsl;
pub mod error;
pub mod helpers;
pub mod record;

pub use config::{
    DirectoryConfig, FileConfig, MacroDelimiters, Ownership, RecordConfig, SymlinkConfig,
};
pub use record::{FileKind, FileRecord, MODULE_SCHEME};

/// Module subdirectory holding plain files.
pub const FILES_DIR: &str = "files";

/// Module subdirectory holding templates.
pub const TEMPLATES_DIR: &str = "templates";

/// Extension appended to template file names.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// Replace every path separator in `path` with an underscore.
///
/// The result is used both as the on-disk file name under `files/` or
/// `templates/` and in the matching Puppet reference.
///
/// # Examples
///
/// ```
/// use puppetize_cli::resources::flatten_path;
///
/// assert_eq!(flatten_path("/etc/motd"), "_etc_motd");
/// ```
#[must_use]
pub fn flatten_path(path: &str) -> String {
    path.replace('/', "_")
}
