//! Derive Puppet module, class, and artifact names from channel metadata.
//!
//! Forge user names are ASCII alphanumeric only; class names may also
//! contain underscores.
use crate::error::ConfigError;
use crate::resources::flatten_path;

/// Names used for one converted channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    /// Forge user name derived from the organisation.
    pub user: String,
    /// Puppet class name derived from the channel.
    pub class: String,
}

impl ModuleNames {
    /// Derive names from an organisation and channel name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidModuleName`] if either derived name is
    /// empty.
    pub fn derive(org_name: &str, channel_name: &str) -> Result<Self, ConfigError> {
        let user: String = org_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if user.is_empty() {
            return Err(ConfigError::InvalidModuleName(format!(
                "organisation '{org_name}' has no alphanumeric characters"
            )));
        }

        let class: String = channel_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        if class.is_empty() {
            return Err(ConfigError::InvalidModuleName(
                "channel name is empty".to_string(),
            ));
        }

        Ok(Self { user, class })
    }

    /// Full module name, `<user>-<class>`; also the module directory name.
    #[must_use]
    pub fn module(&self) -> String {
        format!("{}-{}", self.user, self.class)
    }
}

/// Artifact name for a target path.
#[must_use]
pub fn artifact_name(path: &str) -> String {
    flatten_path(path)
}
