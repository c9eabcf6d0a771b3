//! Authenticated HTTP access to a JIRA instance.
//!
//! [`JiraConnection`] is the only place that talks to the network. It issues
//! a single GET per call and hands back the status and body untouched;
//! interpreting the body is left to the fetcher.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::params::QueryParams;
use crate::config::Profile;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A raw HTTP response: status code plus body text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response body as text.
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Fail with `ApiError::Http` unless the status is 2xx.
    pub fn error_for_status(self, context: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            debug!(status = %self.status, "Error response body: {}", self.body);
            Err(ApiError::from_status(self.status, self.body, context))
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// A connection to one JIRA instance with fixed credentials.
#[derive(Debug, Clone)]
pub struct JiraConnection {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl JiraConnection {
    /// Create a connection with explicit credentials and the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The JIRA instance URL, e.g. `https://company.atlassian.net`
    /// * `username` - The account email
    /// * `token` - The API token
    pub fn new(base_url: &str, username: &str, token: &str) -> Result<Self> {
        Self::with_auth(base_url, Auth::new(username, token), DEFAULT_TIMEOUT_SECS)
    }

    /// Create a connection from prepared credentials.
    pub fn with_auth(base_url: &str, auth: Auth, timeout_secs: u64) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(ApiError::invalid_argument("base URL must not be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            auth,
        })
    }

    /// Create a connection for a configured profile.
    ///
    /// An explicit `token` wins; otherwise the token stored in the OS keyring
    /// for the profile is used.
    pub fn from_profile(profile: &Profile, token: Option<&str>, timeout_secs: u64) -> Result<Self> {
        let auth = match token {
            Some(token) => Auth::new(&profile.email, token),
            None => Auth::from_keyring(&profile.name, &profile.email)?,
        };
        Self::with_auth(&profile.url, auth, timeout_secs)
    }

    /// Perform an authenticated GET against an endpoint.
    ///
    /// Any status is returned as-is; callers decide what counts as failure.
    /// Only transport failures produce an error here.
    #[instrument(skip(self, params), fields(endpoint = %endpoint, param_count = params.len()))]
    pub async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<ApiResponse> {
        let url = self.url_for(endpoint)?;
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .query(params.as_pairs())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Response received");

        Ok(ApiResponse { status, body })
    }

    /// Resolve an endpoint against the base URL.
    ///
    /// Relative paths are appended to the base URL; absolute URLs pass through.
    pub fn url_for(&self, endpoint: &str) -> Result<String> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(ApiError::invalid_argument("endpoint must not be empty"));
        }

        if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
            return Ok(endpoint.to_string());
        }

        Ok(format!(
            "{}/{}",
            self.base_url,
            endpoint.trim_start_matches('/')
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        self.auth.username()
    }
}

/// Normalize the base URL by removing trailing slashes.
///
/// Plain HTTP is allowed but logged, except for loopback hosts.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !is_loopback(url) {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

fn is_loopback(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1") || url.contains("[::1]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> JiraConnection {
        JiraConnection::new("https://company.atlassian.net/", "user@company.com", "token").unwrap()
    }

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_handles_multiple_slashes() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/jira/"),
            "https://company.atlassian.net/jira"
        );
    }

    #[test]
    fn test_url_for_relative_endpoint() {
        let conn = connection();
        assert_eq!(
            conn.url_for("rest/api/2/search").unwrap(),
            "https://company.atlassian.net/rest/api/2/search"
        );
        assert_eq!(
            conn.url_for("/rest/agile/1.0/board").unwrap(),
            "https://company.atlassian.net/rest/agile/1.0/board"
        );
    }

    #[test]
    fn test_url_for_absolute_endpoint() {
        let conn = connection();
        assert_eq!(
            conn.url_for("https://other.atlassian.net/rest/api/3/myself").unwrap(),
            "https://other.atlassian.net/rest/api/3/myself"
        );
    }

    #[test]
    fn test_url_for_empty_endpoint() {
        let conn = connection();
        assert!(matches!(
            conn.url_for("").unwrap_err(),
            ApiError::InvalidArgument(_)
        ));
        assert!(matches!(
            conn.url_for("   ").unwrap_err(),
            ApiError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(JiraConnection::new("", "user", "token").is_err());
    }

    #[test]
    fn test_from_profile_with_explicit_token() {
        let profile = Profile::new(
            "work".to_string(),
            "https://company.atlassian.net".to_string(),
            "user@company.com".to_string(),
        );
        let conn = JiraConnection::from_profile(&profile, Some("token"), 5).unwrap();
        assert_eq!(conn.base_url(), "https://company.atlassian.net");
        assert_eq!(conn.username(), "user@company.com");
    }

    #[test]
    fn test_response_error_for_status() {
        let response = ApiResponse {
            status: StatusCode::NOT_FOUND,
            body: "nope".to_string(),
        };
        let err = response.error_for_status("Failed").unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("nope"));
    }

    #[test]
    fn test_response_json_invalid() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: "<html>".to_string(),
        };
        assert!(matches!(
            response.json().unwrap_err(),
            ApiError::InvalidResponse(_)
        ));
    }
}
