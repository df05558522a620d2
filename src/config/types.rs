use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default concurrency ceiling
pub const DEFAULT_SIZE: usize = 5;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default base pacing delay in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Default user agent, a current desktop Chrome
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default log file name, written next to the executable
pub const DEFAULT_LOG_FILE: &str = "pre-cache.log";

/// One layer of settings, as read from a TOML file or collected from the CLI
///
/// Every field is optional so layers can be merged before defaults apply.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialConfig {
    /// Sitemap URL to warm from
    pub sitemap: Option<String>,

    /// Concurrency ceiling
    pub size: Option<usize>,

    /// Per-request timeout (seconds)
    pub timeout: Option<u64>,

    /// Base pacing delay (milliseconds)
    pub delay: Option<u64>,

    /// Host (and optional port) to send requests to instead of the sitemap's host
    pub host: Option<String>,

    /// Response header carrying the cache status, e.g. `x-cache`
    pub cache_header: Option<String>,

    /// User-Agent header value
    pub user_agent: Option<String>,

    /// Verify TLS certificates
    pub verify: Option<bool>,

    /// Verbose output
    pub debug: Option<bool>,

    /// Log file path
    pub log_file: Option<PathBuf>,
}

impl PartialConfig {
    /// Layers `overrides` on top of `self`; any value set in `overrides` wins
    pub fn merge(self, overrides: PartialConfig) -> PartialConfig {
        PartialConfig {
            sitemap: overrides.sitemap.or(self.sitemap),
            size: overrides.size.or(self.size),
            timeout: overrides.timeout.or(self.timeout),
            delay: overrides.delay.or(self.delay),
            host: overrides.host.or(self.host),
            cache_header: overrides.cache_header.or(self.cache_header),
            user_agent: overrides.user_agent.or(self.user_agent),
            verify: overrides.verify.or(self.verify),
            debug: overrides.debug.or(self.debug),
            log_file: overrides.log_file.or(self.log_file),
        }
    }
}

/// Scheme and authority captured from the sitemap URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOrigin {
    /// `http` or `https`
    pub scheme: String,

    /// Host including an explicit port, e.g. `example.com` or `example.com:8443`
    pub domain: String,
}

/// Immutable snapshot of everything a warm run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sitemap URL
    pub sitemap_url: String,

    /// Origin captured from the sitemap URL
    pub origin: SiteOrigin,

    /// Maximum number of in-flight requests; 1 selects sequential mode
    pub concurrency: usize,

    /// Base pacing delay before each request
    pub delay: Duration,

    /// Per-request timeout, enforced by the fetcher
    pub timeout: Duration,

    /// Override host for probe requests
    pub host: Option<String>,

    /// Cache-status header name; `None` disables classification
    pub cache_header: Option<String>,

    /// Verify TLS certificates
    pub verify_tls: bool,

    /// User-Agent header value
    pub user_agent: String,

    /// Verbose output
    pub debug: bool,

    /// Where the reporter mirrors its output, if anywhere
    pub log_file: Option<PathBuf>,
}

impl RunConfig {
    /// Headers sent with every probe request
    ///
    /// With a host override the `Host` header carries the sitemap's own domain,
    /// so the cache keys the request the same way it would for real visitors.
    pub fn probe_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("User-Agent".to_string(), self.user_agent.clone())];
        if self.host.is_some() {
            headers.push(("Host".to_string(), self.origin.domain.clone()));
        }
        headers
    }

    /// The cache-status header name, or `""` when classification is disabled
    pub fn cache_header_name(&self) -> &str {
        self.cache_header.as_deref().unwrap_or("")
    }
}
