//! Fetch settings.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::connection::DEFAULT_TIMEOUT_SECS;
use crate::api::DEFAULT_FETCH_SIZE;

/// Settings shared by every profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The profile used when none is named.
    pub default_profile: Option<String>,
    /// Results requested per page.
    pub page_size: u32,
    /// Cap on the number of items a paginated fetch returns.
    pub max_items: Option<usize>,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            page_size: DEFAULT_FETCH_SIZE,
            max_items: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.page_size < 1 {
            return Err(ConfigError::ValidationError(
                "page_size must be >= 1".to_string(),
            ));
        }
        if self.timeout_secs < 1 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.max_items.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str("page_size = 10").unwrap();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let settings = Settings {
            page_size: 0,
            ..Settings::default()
        };
        assert!(settings
            .validate()
            .unwrap_err()
            .to_string()
            .contains("page_size"));
    }
}
