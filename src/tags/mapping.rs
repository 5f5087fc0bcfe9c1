//! Tag → replacement table used by the substitution engine.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Built-in mapping from Satellite/Spacewalk macros to Puppet facts.
///
/// Macros without a Puppet equivalent carry an empty replacement: the tag is
/// removed and only the [`SENTINEL`] remains (see [`MappingTable::rewrite`]).
pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("rhn.system.sid", ""),
    ("rhn.system.profile_name", ""),
    ("rhn.system.description", ""),
    ("rhn.system.hostname", "fqdn"),
    ("rhn.system.ip_address", "ipaddress"),
    ("rhn.system.custom_info(key_name)", ""),
    (
        "rhn.system.net_interface.ip_address(eth_device)",
        "ipaddress_{NETWORK INTERFACE}",
    ),
    (
        "rhn.system.net_interface.netmask(eth_device)",
        "netmask_{NETWORK INTERFACE}",
    ),
    ("rhn.system.net_interface.broadcast(eth_device)", ""),
    (
        "rhn.system.net_interface.hardware_address(eth_device)",
        "macaddress_{NETWORK INTERFACE}",
    ),
    ("rhn.system.net_interface.driver_module(eth_device)", ""),
];

/// Character prepended to every rewritten macro region.
pub const SENTINEL: char = '@';

/// Which entry wins when a marked region contains more than one tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchOrder {
    /// Longest tag first; equal lengths are ordered lexicographically.
    #[default]
    Specificity,
    /// The order in which entries were supplied.
    Declared,
}

/// On-disk shape of a mapping file: `{"mapping": {"<tag>": "<replacement>"}}`.
#[derive(Debug, Deserialize)]
struct MappingFile {
    mapping: BTreeMap<String, String>,
}

/// An ordered, read-only table of macro tags and their replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<(String, String)>,
    order: MatchOrder,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAPPING.iter().copied(), MatchOrder::default())
    }
}

impl MappingTable {
    /// Build a table from `(tag, replacement)` pairs.
    ///
    /// Empty tags are dropped. A repeated tag keeps its last replacement.
    pub fn new<I, K, V>(entries: I, order: MatchOrder) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut collected: Vec<(String, String)> = Vec::new();
        for (tag, value) in entries {
            let tag = tag.into();
            if tag.is_empty() {
                continue;
            }
            let value = value.into();
            match collected.iter_mut().find(|(t, _)| *t == tag) {
                Some(existing) => existing.1 = value,
                None => collected.push((tag, value)),
            }
        }
        if order == MatchOrder::Specificity {
            collected.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
        Self {
            entries: collected,
            order,
        }
    }

    /// A table that never matches anything.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::<(String, String)>::new(), MatchOrder::default())
    }

    /// Parse a JSON mapping document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] if the text is not a mapping file.
    pub fn from_json_str(json: &str, order: MatchOrder) -> Result<Self, ConfigError> {
        Self::parse(json, order, PathBuf::new())
    }

    /// Load a JSON mapping file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path, order: MatchOrder) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json, order, path.to_path_buf())
    }

    fn parse(json: &str, order: MatchOrder, path: PathBuf) -> Result<Self, ConfigError> {
        let file: MappingFile =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson {
                path,
                message: e.to_string(),
            })?;
        Ok(Self::new(file.mapping, order))
    }

    /// The tie-break order this table was built with.
    #[must_use]
    pub const fn order(&self) -> MatchOrder {
        self.order
    }

    /// Number of entries, including ones with empty replacements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in match order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Rewrite a marked region using the first entry whose tag it contains.
    ///
    /// Every occurrence of the winning tag is replaced and the result is
    /// prefixed with [`SENTINEL`]. An empty replacement still matches and
    /// deletes the tag. Returns `None` when no entry's tag occurs in `region`.
    #[must_use]
    pub fn rewrite(&self, region: &str) -> Option<String> {
        self.entries()
            .find(|(tag, _)| region.contains(tag))
            .map(|(tag, value)| format!("{SENTINEL}{}", region.replace(tag, value)))
    }
}
