//! Basic authentication for the JIRA REST API.
//!
//! JIRA Cloud accepts `email:api_token` as HTTP Basic credentials. Tokens can
//! be supplied directly or looked up in the OS keyring by profile name.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::error::{ApiError, Result};

/// The keyring service name under which tokens are stored.
const KEYRING_SERVICE: &str = "jira-api-fetcher";

/// Basic-auth credentials for a JIRA connection.
///
/// Only the encoded header is kept; the raw token is dropped after encoding.
#[derive(Clone)]
pub struct Auth {
    username: String,
    auth_header: String,
}

impl Auth {
    /// Create credentials from a username (email) and API token.
    pub fn new(username: &str, token: &str) -> Self {
        Self {
            username: username.to_string(),
            auth_header: build_auth_header(username, token),
        }
    }

    /// Create credentials using the token stored in the OS keyring for a profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Keyring` if no token can be read for the profile.
    pub fn from_keyring(profile_name: &str, username: &str) -> Result<Self> {
        let token = get_token(profile_name)?;
        Ok(Self::new(username, &token))
    }

    /// The complete `Basic ...` header value.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// The username the credentials belong to.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

fn build_auth_header(username: &str, token: &str) -> String {
    let credentials = format!("{}:{}", username, token);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))
}

/// Store an API token in the OS keyring under the profile name.
pub fn store_token(profile_name: &str, token: &str) -> Result<()> {
    keyring_entry(profile_name)?
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))
}

/// Retrieve the API token stored for a profile.
pub fn get_token(profile_name: &str) -> Result<String> {
    keyring_entry(profile_name)?
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete the API token stored for a profile.
pub fn delete_token(profile_name: &str) -> Result<()> {
    keyring_entry(profile_name)?
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))
}
