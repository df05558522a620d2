//! HTTP fetcher implementation
//!
//! The dispatcher only knows the [`Fetcher`] trait. [`HttpFetcher`] is the
//! `reqwest` implementation used by the binary; tests substitute their own.

use crate::config::RunConfig;
use crate::warmer::outcome::{ProbeRequest, ProbeResponse, RequestError};
use crate::PrecacheError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;

/// Idle connections kept per host between probes
const MAX_IDLE_PER_HOST: usize = 10;

/// How long an idle pooled connection is kept
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport capability used by a warm run
///
/// Timeouts are the fetcher's job: a request that runs past
/// [`ProbeRequest::timeout`] must come back as [`RequestError::Timeout`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the sitemap document body
    ///
    /// Anything other than HTTP 200 is an error.
    async fn fetch_document(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<String, PrecacheError>;

    /// Issues one probe request and returns its status and headers
    async fn fetch(&self, request: ProbeRequest) -> Result<ProbeResponse, RequestError>;
}

/// Builds the HTTP client for a run
///
/// Certificate verification is a client-wide setting, so it is decided here
/// rather than per request.
///
/// # Example
///
/// ```no_run
/// use precache::config::{load_config, PartialConfig};
/// use precache::warmer::build_http_client;
///
/// let config = load_config(None, PartialConfig {
///     sitemap: Some("https://example.com/sitemap.xml".to_string()),
///     ..Default::default()
/// }).unwrap();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &RunConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
        .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
        .pool_idle_timeout(IDLE_TIMEOUT)
        .danger_accept_invalid_certs(!config.verify_tls)
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &RunConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_document(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<String, PrecacheError> {
        let fetch_error = |message: String| PrecacheError::DocumentFetch {
            url: url.to_string(),
            message,
        };

        let headers = header_map(headers).map_err(|e| fetch_error(e.to_string()))?;
        let response = self
            .client
            .get(url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| fetch_error(classify_error(&e).to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(PrecacheError::DocumentStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| fetch_error(classify_error(&e).to_string()))
    }

    async fn fetch(&self, request: ProbeRequest) -> Result<ProbeResponse, RequestError> {
        let headers = header_map(&request.headers)?;

        let response = self
            .client
            .request(request.method, &request.url)
            .headers(headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        // Read the body so the edge finishes filling its cache entry
        if let Err(e) = response.bytes().await {
            tracing::debug!("Body of {} not fully read: {}", request.url, e);
        }

        Ok(ProbeResponse { status, headers })
    }
}

/// Maps a `reqwest` error onto the probe error taxonomy
pub fn classify_error(error: &reqwest::Error) -> RequestError {
    if error.is_timeout() {
        RequestError::Timeout
    } else if error.is_connect() {
        RequestError::Connect(error.to_string())
    } else {
        RequestError::Transport(error.to_string())
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, RequestError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::Transport(format!("invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::Transport(format!("invalid header value: {}", e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        collected
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}
