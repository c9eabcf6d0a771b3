//! Connection profiles.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Connection details for one JIRA instance.
///
/// The API token is not part of the profile; it is supplied at runtime or
/// read from the OS keyring under the profile name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Unique, whitespace-free profile name.
    pub name: String,
    /// The JIRA instance URL, e.g. `https://company.atlassian.net`.
    pub url: String,
    /// The account email used as the Basic-auth username.
    pub email: String,
}

impl Profile {
    pub fn new(name: String, url: String, email: String) -> Self {
        Self { name, url, email }
    }

    /// Check that the name, URL and email are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(invalid("profile name cannot be empty".to_string()));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(invalid(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.url.is_empty() {
            return Err(invalid(format!("profile '{}': URL cannot be empty", self.name)));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(invalid(format!(
                "profile '{}': URL must start with http:// or https://",
                self.name
            )));
        }

        if self.email.is_empty() {
            return Err(invalid(format!(
                "profile '{}': email cannot be empty",
                self.name
            )));
        }

        if !self.email.contains('@') {
            return Err(invalid(format!(
                "profile '{}': '{}' does not appear to be a valid email address",
                self.name, self.email
            )));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::ValidationError(msg)
}
