//! Query parameters for JIRA requests.
//!
//! Parameters are kept as ordered key/value pairs so that repeated keys
//! (e.g. `expand=a&expand=b`) survive and the request URL is deterministic.

use serde_json::{Map, Value};

use super::error::{ApiError, Result};

/// An ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping any existing entries with the same key.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Builder-style variant of [`QueryParams::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Set a parameter, replacing every existing entry with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        self.remove(&key);
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Remove every entry with the given key. Returns whether any were removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.len() != before
    }

    /// The first value stored for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any entry uses the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Append all entries of another parameter list.
    pub fn extend(&mut self, other: QueryParams) {
        self.pairs.extend(other.pairs);
    }

    /// The parameters as key/value pairs, in insertion order.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parse parameters from a JSON-encoded object such as `{"expand": "names"}`.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidParams` if the string is not valid JSON
    /// - `ApiError::InvalidArgument` if the JSON is not an object or holds
    ///   nested objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Self::from_json_object(&map),
            other => Err(ApiError::invalid_argument(format!(
                "query parameters must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build parameters from a JSON object.
    ///
    /// Strings are used verbatim, numbers and booleans are rendered as text,
    /// arrays become repeated keys and `null` values are skipped.
    pub fn from_json_object(map: &Map<String, Value>) -> Result<Self> {
        let mut params = Self::new();
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar_to_string(key, item)? {
                            params.push(key.as_str(), text);
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_to_string(key, other)? {
                        params.push(key.as_str(), text);
                    }
                }
            }
        }
        Ok(params)
    }
}

fn scalar_to_string(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(ApiError::invalid_argument(format!(
            "query parameter '{}' cannot be {}",
            key,
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
