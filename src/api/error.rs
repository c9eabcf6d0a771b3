//! API error types for the JIRA fetcher.

use thiserror::Error;

/// Errors that can occur when fetching from the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ///
    /// Carries the status code and the raw response body for diagnostics.
    #[error("{context}: {body} (Status Code: {status})")]
    Http {
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body.
        body: String,
        /// What the fetcher was doing when the request failed.
        context: String,
    },

    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be interpreted.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A caller-supplied argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Extra query parameters were not valid JSON.
    #[error("Invalid query parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from a non-successful HTTP response.
    pub fn from_status(status: reqwest::StatusCode, body: impl Into<String>, context: &str) -> Self {
        ApiError::Http {
            status: status.as_u16(),
            body: body.into(),
            context: context.to_string(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ApiError::InvalidArgument(msg.into())
    }

    /// The HTTP status code, if this error came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The raw response body, if this error came from a server response.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Whether the server refused access to the resource.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.status(), Some(403))
    }

    /// Whether the server rate limited the request.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(429))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_from_status_keeps_status_and_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom", "ctx");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("boom"));
    }

    #[test]
    fn test_error_display_matches_fetch_message() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "error message",
            "Failed to fetch data as array",
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch data as array: error message (Status Code: 500)"
        );
    }

    #[test]
    fn test_error_status_predicates() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "", "ctx");
        assert!(err.is_unauthorized());
        assert!(!err.is_forbidden());

        let err = ApiError::from_status(StatusCode::FORBIDDEN, "", "ctx");
        assert!(err.is_forbidden());

        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "", "ctx");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let err = ApiError::invalid_argument("endpoint must not be empty");
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert_eq!(err.to_string(), "Invalid argument: endpoint must not be empty");
    }

    #[test]
    fn test_invalid_params_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::InvalidParams(_)));
    }
}
