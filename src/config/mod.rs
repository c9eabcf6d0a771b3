//! Configuration management for jira-api-fetcher.
//!
//! Configuration is a TOML file holding connection profiles and fetch
//! settings. API tokens are never stored here; they come from the command
//! line, the environment or the OS keyring.

mod profile;
mod settings;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use profile::Profile;
pub use settings::Settings;

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "jira-api-fetcher";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration: {0}")]
    ReadError(#[source] io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but holds invalid values.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// The requested profile does not exist.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The full configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Fetch settings.
    #[serde(default)]
    pub settings: Settings,
    /// Connection profiles.
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Config {
    /// The default configuration file path.
    ///
    /// - Linux: `~/.config/jira-api-fetcher/config.toml`
    /// - macOS: `~/Library/Application Support/jira-api-fetcher/config.toml`
    /// - Windows: `%APPDATA%\jira-api-fetcher\config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load and validate configuration from a file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e)),
        };

        debug!(path = %path.display(), "Loading configuration");
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings, every profile, and profile name uniqueness.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        for (i, profile) in self.profiles.iter().enumerate() {
            profile.validate()?;
            if self.profiles[..i].iter().any(|p| p.name == profile.name) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        if let Some(name) = &self.settings.default_profile {
            if !self.profiles.iter().any(|p| &p.name == name) {
                return Err(ConfigError::ValidationError(format!(
                    "default profile '{}' is not defined",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// The profile to use when none is named explicitly.
    ///
    /// This is `settings.default_profile` if set, otherwise the only profile
    /// when exactly one is configured.
    pub fn default_profile(&self) -> Option<&Profile> {
        match &self.settings.default_profile {
            Some(name) => self.profiles.iter().find(|p| &p.name == name),
            None if self.profiles.len() == 1 => self.profiles.first(),
            None => None,
        }
    }

    /// Resolve an optional profile name to a profile.
    ///
    /// A named profile must exist; without a name the default profile (if
    /// any) is returned.
    pub fn select_profile(&self, name: Option<&str>) -> Result<Option<&Profile>> {
        match name {
            Some(name) => self.profile(name).map(Some),
            None => Ok(self.default_profile()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const SAMPLE: &str = r#"
[settings]
default_profile = "work"
page_size = 25
max_items = 500

[[profiles]]
name = "work"
url = "https://company.atlassian.net"
email = "user@company.com"

[[profiles]]
name = "oss"
url = "https://oss.atlassian.net"
email = "me@example.org"
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.settings.page_size, 25);
        assert_eq!(config.settings.max_items, Some(500));
        assert_eq!(config.settings.timeout_secs, 30);
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.default_profile().unwrap().name, "work");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.profile("oss").unwrap().email, "me@example.org");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = Config::from_toml_str("[settings\npage_size = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_duplicate_profiles_rejected() {
        let toml = r#"
[[profiles]]
name = "work"
url = "https://a.atlassian.net"
email = "a@a.com"

[[profiles]]
name = "work"
url = "https://b.atlassian.net"
email = "b@b.com"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate profile name 'work'"));
    }

    #[test]
    fn test_unknown_default_profile_rejected() {
        let toml = r#"
[settings]
default_profile = "missing"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_single_profile_is_default() {
        let toml = r#"
[[profiles]]
name = "only"
url = "https://only.atlassian.net"
email = "o@o.com"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.default_profile().unwrap().name, "only");
    }

    #[test]
    fn test_select_profile() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.select_profile(Some("oss")).unwrap().unwrap().name, "oss");
        assert_eq!(config.select_profile(None).unwrap().unwrap().name, "work");
        assert!(matches!(
            config.select_profile(Some("nope")).unwrap_err(),
            ConfigError::ProfileNotFound(_)
        ));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with("jira-api-fetcher/config.toml"));
        }
    }
}
