//! Response-shape aware fetch helpers.
//!
//! [`JiraApiFetcher`] wraps a [`JiraConnection`] and knows how JIRA wraps
//! its results: bare arrays, `values`/`isLast` pages and `issues`/`total`
//! search pages. All paginated methods share one sequential loop; each page
//! request depends on the offset produced by the previous one.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::connection::JiraConnection;
use super::error::{ApiError, Result};
use super::pagination::{
    Page, PageCursor, DEFAULT_RESULTS_KEY, ISSUES_KEY, MAX_RESULTS_PARAM, START_AT_PARAM,
};
use super::params::QueryParams;

/// Default number of results requested per page.
pub const DEFAULT_FETCH_SIZE: u32 = 50;

const ARRAY_CONTEXT: &str = "Failed to fetch data as array";
const PAGINATED_CONTEXT: &str = "Failed to fetch paginated values";
const ISSUES_CONTEXT: &str = "Failed to fetch issues";

/// Fetches and aggregates JIRA API results.
#[derive(Debug, Clone)]
pub struct JiraApiFetcher {
    connection: JiraConnection,
    max_items: Option<usize>,
}

impl JiraApiFetcher {
    pub fn new(connection: JiraConnection) -> Self {
        Self {
            connection,
            max_items: None,
        }
    }

    /// Cap the number of items a paginated fetch returns across all pages.
    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn connection(&self) -> &JiraConnection {
        &self.connection
    }

    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// Fetch an endpoint that returns a bare JSON array.
    ///
    /// Performs exactly one request without query parameters.
    ///
    /// # Errors
    ///
    /// - `ApiError::Http` if the status is not 2xx
    /// - `ApiError::InvalidResponse` if the body is not a JSON array
    pub async fn fetch_array(&self, endpoint: &str) -> Result<Vec<Value>> {
        self.fetch_array_with(endpoint, &QueryParams::new()).await
    }

    /// Like [`JiraApiFetcher::fetch_array`], with explicit query parameters.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn fetch_array_with(&self, endpoint: &str, params: &QueryParams) -> Result<Vec<Value>> {
        validate_endpoint(endpoint)?;

        let body = self
            .connection
            .get(endpoint, params)
            .await?
            .error_for_status(ARRAY_CONTEXT)?
            .json()?;

        match body {
            Value::Array(items) => {
                debug!("Fetched {} items", items.len());
                Ok(items)
            }
            _ => Err(ApiError::InvalidResponse(
                "expected a JSON array in response".to_string(),
            )),
        }
    }

    /// Fetch every page of an offset-paginated endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Relative endpoint path, e.g. `rest/api/3/statuses/search`
    /// * `results_key` - Key holding each page's results; defaults to `values`
    /// * `params_json` - Extra query parameters as a JSON object string
    /// * `fetch_size` - Results requested per page (at least 1)
    ///
    /// # Errors
    ///
    /// Arguments are validated before the first request. A failing page
    /// aborts the whole fetch and discards pages already received.
    #[instrument(skip(self, params_json), fields(endpoint = %endpoint))]
    pub async fn fetch_paginated(
        &self,
        endpoint: &str,
        results_key: Option<&str>,
        params_json: Option<&str>,
        fetch_size: u32,
    ) -> Result<Vec<Value>> {
        validate_endpoint(endpoint)?;
        validate_fetch_size(fetch_size)?;

        let extra = match params_json {
            Some(json) => QueryParams::from_json_str(json)?,
            None => QueryParams::new(),
        };

        self.paginate(
            endpoint,
            results_key.unwrap_or(DEFAULT_RESULTS_KEY),
            extra,
            fetch_size,
            PAGINATED_CONTEXT,
        )
        .await
    }

    /// Fetch issues from a JQL search endpoint such as `rest/api/2/search`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The search endpoint
    /// * `fields` - Comma-separated field selection, e.g. `summary,status`
    /// * `jql` - JQL filter
    /// * `fetch_size` - Issues requested per page (at least 1)
    ///
    /// Stops once `total` issues were received, on a short page, or at the
    /// item cap.
    #[instrument(skip_all, fields(endpoint = %endpoint, jql = ?jql))]
    pub async fn fetch_issues(
        &self,
        endpoint: &str,
        fields: Option<&str>,
        jql: Option<&str>,
        fetch_size: u32,
    ) -> Result<Vec<Value>> {
        validate_endpoint(endpoint)?;
        validate_fetch_size(fetch_size)?;

        let mut extra = QueryParams::new();
        if let Some(jql) = jql {
            extra.push("jql", jql);
        }
        if let Some(fields) = fields.and_then(normalize_fields) {
            extra.push("fields", fields);
        }

        self.paginate(endpoint, ISSUES_KEY, extra, fetch_size, ISSUES_CONTEXT)
            .await
    }

    async fn paginate(
        &self,
        endpoint: &str,
        results_key: &str,
        mut extra: QueryParams,
        fetch_size: u32,
        context: &str,
    ) -> Result<Vec<Value>> {
        for key in [START_AT_PARAM, MAX_RESULTS_PARAM] {
            if extra.remove(key) {
                warn!("Ignoring extra '{}' parameter; pagination sets it", key);
            }
        }

        let mut cursor = PageCursor::new(fetch_size, self.max_items);
        let mut results = Vec::new();
        let mut pages = 0u32;

        while !cursor.is_done() {
            let mut params = cursor.page_params();
            params.extend(extra.clone());

            let body = self
                .connection
                .get(endpoint, &params)
                .await?
                .error_for_status(context)?
                .json()?;

            let page = Page::from_body(body, results_key)?;
            pages += 1;
            debug!(
                start_at = cursor.offset(),
                received = page.len(),
                total = ?page.total,
                is_last = ?page.is_last,
                "Fetched page"
            );

            results.extend(cursor.advance(page));
        }

        info!(
            items = results.len(),
            pages,
            reason = ?cursor.stop_reason(),
            "Pagination finished"
        );
        Ok(results)
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.trim().is_empty() {
        return Err(ApiError::invalid_argument("endpoint must not be empty"));
    }
    Ok(())
}

fn validate_fetch_size(fetch_size: u32) -> Result<()> {
    if fetch_size < 1 {
        return Err(ApiError::invalid_argument("fetch_size must be >= 1"));
    }
    Ok(())
}

/// Trim each entry of a comma-separated field list and drop blanks.
fn normalize_fields(fields: &str) -> Option<String> {
    let joined = fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}
