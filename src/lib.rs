//! jira-api-fetcher - paginated fetch helpers for the JIRA Cloud REST API.
//!
//! ```no_run
//! use jira_api_fetcher::api::{JiraApiFetcher, JiraConnection};
//!
//! # async fn demo() -> Result<(), jira_api_fetcher::api::ApiError> {
//! let connection = JiraConnection::new("https://company.atlassian.net", "me@company.com", "token")?;
//! let fetcher = JiraApiFetcher::new(connection);
//!
//! let issues = fetcher
//!     .fetch_issues("rest/api/2/search", Some("summary,status"), Some("project = FOO"), 50)
//!     .await?;
//! println!("{} issues", issues.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ApiError, JiraApiFetcher, JiraConnection};
