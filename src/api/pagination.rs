//! Offset-based pagination over JIRA response envelopes.
//!
//! JIRA endpoint families page their results differently:
//! - Agile API and newer platform endpoints: `{"values": [...], "isLast": bool}`
//! - Platform search: `{"issues": [...], "startAt", "maxResults", "total"}`
//! - Some platform endpoints: a bare top-level array
//!
//! [`Page`] normalizes those shapes and [`PageCursor`] decides when to stop.

use serde::Deserialize;
use serde_json::Value;

use super::error::{ApiError, Result};
use super::params::QueryParams;

/// Results key used by Agile API and `.../search` style endpoints.
pub const DEFAULT_RESULTS_KEY: &str = "values";

/// Results key used by the JQL issue search endpoints.
pub const ISSUES_KEY: &str = "issues";

/// Query parameter carrying the page offset.
pub const START_AT_PARAM: &str = "startAt";

/// Query parameter carrying the page size.
pub const MAX_RESULTS_PARAM: &str = "maxResults";

/// Pagination metadata found next to the results array.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    start_at: Option<u64>,
    max_results: Option<u64>,
    total: Option<u64>,
    is_last: Option<bool>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The page's result items, in server order.
    pub items: Vec<Value>,
    /// Offset of the first item, as reported by the server.
    pub start_at: Option<u64>,
    /// Page size the server applied.
    pub max_results: Option<u64>,
    /// Total number of items available.
    pub total: Option<u64>,
    /// Explicit last-page flag.
    pub is_last: Option<bool>,
}

impl Page {
    /// Extract a page from a response body.
    ///
    /// A bare array is the page itself. Otherwise the body must be an object
    /// holding an array under `results_key`.
    pub fn from_body(body: Value, results_key: &str) -> Result<Self> {
        let mut map = match body {
            Value::Array(items) => {
                return Ok(Self {
                    items,
                    start_at: None,
                    max_results: None,
                    total: None,
                    is_last: None,
                })
            }
            Value::Object(map) => map,
            _ => {
                return Err(ApiError::InvalidResponse(
                    "expected a JSON object or array".to_string(),
                ))
            }
        };

        let items = match map.remove(results_key) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ApiError::InvalidResponse(format!(
                    "'{}' is not an array",
                    results_key
                )))
            }
            None => {
                return Err(ApiError::InvalidResponse(format!(
                    "missing '{}' in response",
                    results_key
                )))
            }
        };

        let meta: PageMeta = serde_json::from_value(Value::Object(map)).map_err(|e| {
            ApiError::InvalidResponse(format!("invalid pagination fields: {}", e))
        })?;

        Ok(Self {
            items,
            start_at: meta.start_at,
            max_results: meta.max_results,
            total: meta.total,
            is_last: meta.is_last,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Why a paginated fetch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page held fewer items than the page size.
    ShortPage,
    /// The server flagged the page as the last one.
    LastPage,
    /// The offset reached the reported total.
    TotalReached,
    /// The caller's item cap was reached.
    LimitReached,
}

/// Tracks the offset across pages and decides when to stop.
///
/// A short page always ends the walk, even when `total` claims more items
/// remain, so a misreporting server cannot cause an endless loop.
#[derive(Debug, Clone)]
pub struct PageCursor {
    offset: u64,
    page_size: u64,
    max_items: Option<usize>,
    fetched: usize,
    stop: Option<StopReason>,
}

impl PageCursor {
    /// Create a cursor starting at offset 0.
    ///
    /// `page_size` must be at least 1; callers validate it.
    pub fn new(page_size: u32, max_items: Option<usize>) -> Self {
        Self {
            offset: 0,
            page_size: u64::from(page_size),
            max_items,
            fetched: 0,
            stop: (max_items == Some(0)).then_some(StopReason::LimitReached),
        }
    }

    /// Offset of the next page to request.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of items handed out so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn is_done(&self) -> bool {
        self.stop.is_some()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Pagination parameters for the next request.
    pub fn page_params(&self) -> QueryParams {
        QueryParams::new()
            .with(START_AT_PARAM, self.offset)
            .with(MAX_RESULTS_PARAM, self.page_size)
    }

    /// Consume a page and return the items to keep.
    ///
    /// Items beyond the item cap are dropped. After this call
    /// [`PageCursor::is_done`] reports whether another request is needed.
    pub fn advance(&mut self, page: Page) -> Vec<Value> {
        let received = page.items.len() as u64;
        // Servers may clamp maxResults below what was asked for.
        let effective_size = match page.max_results {
            Some(size) if size > 0 && size < self.page_size => size,
            _ => self.page_size,
        };
        self.offset += received;

        let mut items = page.items;
        if let Some(cap) = self.max_items {
            let remaining = cap.saturating_sub(self.fetched);
            if items.len() >= remaining {
                items.truncate(remaining);
                self.stop = Some(StopReason::LimitReached);
            }
        }
        self.fetched += items.len();

        if self.stop.is_none() {
            self.stop = if received < effective_size {
                Some(StopReason::ShortPage)
            } else if page.is_last == Some(true) {
                Some(StopReason::LastPage)
            } else if page.total.is_some_and(|total| self.offset >= total) {
                Some(StopReason::TotalReached)
            } else {
                None
            };
        }

        items
    }
}
