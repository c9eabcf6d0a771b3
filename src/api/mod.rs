//! JIRA REST API access.
//!
//! [`JiraConnection`] performs authenticated GET requests; [`JiraApiFetcher`]
//! layers response-shape handling and pagination on top of it.

pub mod auth;
pub mod connection;
pub mod error;
pub mod fetcher;
pub mod pagination;
pub mod params;

pub use auth::Auth;
pub use connection::{ApiResponse, JiraConnection};
pub use error::ApiError;
pub use fetcher::{JiraApiFetcher, DEFAULT_FETCH_SIZE};
pub use pagination::{Page, PageCursor, StopReason};
pub use params::QueryParams;
