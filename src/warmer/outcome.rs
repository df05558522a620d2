//! Request and outcome types shared by the fetcher and dispatcher

use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// A single probe request handed to a [`Fetcher`](super::Fetcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl ProbeRequest {
    /// Value of the first request header named `name`, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and headers of a completed probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers, each name mapped to its values in arrival order
    pub headers: BTreeMap<String, Vec<String>>,
}

impl ProbeResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
        }
    }

    /// Appends a header value, builder style
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// The first header whose name matches `name` case-insensitively
    ///
    /// Names are visited in the map's sorted order, so if a response carries
    /// the same header under two spellings the lexicographically smaller one
    /// wins.
    pub fn header(&self, name: &str) -> Option<(&str, &[String])> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Why a single probe produced no response
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Error)]
pub enum RequestError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("request task aborted: {0}")]
    Aborted(String),
}

/// Result of probing one target URL
///
/// A failed probe carries no status or headers; the `Result` makes that
/// structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestOutcome {
    pub url: String,
    pub response: Result<ProbeResponse, RequestError>,
}

impl RequestOutcome {
    pub fn success(url: impl Into<String>, response: ProbeResponse) -> Self {
        Self {
            url: url.into(),
            response: Ok(response),
        }
    }

    pub fn failure(url: impl Into<String>, error: RequestError) -> Self {
        Self {
            url: url.into(),
            response: Err(error),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().ok().map(|r| r.status)
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.response.as_ref().err()
    }

    pub fn is_error(&self) -> bool {
        self.response.is_err()
    }
}
