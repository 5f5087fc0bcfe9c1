//! Tool configuration: a TOML file whose `[puppet]` table sets output
//! locations, the macro mapping, and class parameters.
pub mod toml_loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::scaffold::{MAIN_MANIFEST, ScaffoldMode};
use crate::tags::{DEFAULT_MAPPING, MappingTable, MatchOrder};

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/puppetize/puppetize.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The `[puppet]` table.
    pub puppet: PuppetSection,
}

/// Settings for the generated module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PuppetSection {
    /// Directory the module is built in; defaults to the current directory.
    pub working_dir: Option<PathBuf>,
    /// Directory the finished module is placed in; defaults to `working_dir`.
    pub output_dir: Option<PathBuf>,
    /// JSON mapping file; the built-in table is used when unset.
    pub mapping: Option<PathBuf>,
    /// Class parameters written into the manifest header.
    #[serde(deserialize_with = "parameter_list")]
    pub custom_parameters: Vec<String>,
    /// Manifest to patch, without the `.pp` extension.
    pub manifest: String,
    /// Tie-break order for overlapping mapping tags.
    pub match_order: MatchOrder,
    /// How the module skeleton is created.
    pub scaffold: ScaffoldMode,
}

impl Default for PuppetSection {
    fn default() -> Self {
        Self {
            working_dir: None,
            output_dir: None,
            mapping: None,
            custom_parameters: Vec::new(),
            manifest: MAIN_MANIFEST.to_string(),
            match_order: MatchOrder::default(),
            scaffold: ScaffoldMode::default(),
        }
    }
}

impl Config {
    /// Load the configuration at `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(path)
    }
}

impl PuppetSection {
    /// The working directory with `~` expanded, falling back to `cwd`.
    #[must_use]
    pub fn resolved_working_dir(&self, cwd: &Path) -> PathBuf {
        self.working_dir
            .as_deref()
            .map_or_else(|| cwd.to_path_buf(), expand_tilde)
    }

    /// The output directory with `~` expanded, falling back to the working
    /// directory.
    #[must_use]
    pub fn resolved_output_dir(&self, cwd: &Path) -> PathBuf {
        self.output_dir
            .as_deref()
            .map_or_else(|| self.resolved_working_dir(cwd), expand_tilde)
    }

    /// Load the configured mapping table, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping file cannot be read or parsed.
    pub fn mapping_table(&self) -> Result<MappingTable, ConfigError> {
        match &self.mapping {
            Some(path) => MappingTable::load(&expand_tilde(path), self.match_order),
            None => Ok(MappingTable::new(
                DEFAULT_MAPPING.iter().copied(),
                self.match_order,
            )),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    std::env::var_os("HOME").map_or_else(|| path.to_path_buf(), |home| PathBuf::from(home).join(rest))
}

/// Accept either a TOML array or a single comma-separated string.
fn parameter_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(items
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}
