use crate::config::types::{
    PartialConfig, RunConfig, SiteOrigin, DEFAULT_DELAY_MS, DEFAULT_SIZE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Applies defaults to a merged settings layer and validates the result
///
/// # Returns
///
/// * `Ok(RunConfig)` - A complete, validated run configuration
/// * `Err(ConfigError)` - The sitemap is missing or a value is out of range
pub fn resolve(partial: PartialConfig) -> Result<RunConfig, ConfigError> {
    let sitemap_url = partial
        .sitemap
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingSitemap)?;
    let origin = parse_origin(&sitemap_url)?;

    let concurrency = partial.size.unwrap_or(DEFAULT_SIZE);
    if concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "size must be >= 1, got {}",
            concurrency
        )));
    }

    let timeout = partial.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            timeout
        )));
    }

    let host = match partial.host.map(|h| h.trim().to_string()) {
        Some(h) if h.is_empty() => None,
        Some(h) => {
            validate_host(&h)?;
            Some(h)
        }
        None => None,
    };

    let cache_header = partial
        .cache_header
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty());

    let user_agent = partial
        .user_agent
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Ok(RunConfig {
        sitemap_url,
        origin,
        concurrency,
        delay: Duration::from_millis(partial.delay.unwrap_or(DEFAULT_DELAY_MS)),
        timeout: Duration::from_secs(timeout),
        host,
        cache_header,
        verify_tls: partial.verify.unwrap_or(false),
        user_agent,
        debug: partial.debug.unwrap_or(false),
        log_file: partial.log_file,
    })
}

/// Captures scheme and host (with port) from the sitemap URL
pub fn parse_origin(sitemap_url: &str) -> Result<SiteOrigin, ConfigError> {
    let url = Url::parse(sitemap_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", sitemap_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: scheme must be http or https",
            sitemap_url
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ConfigError::InvalidUrl(format!("{}: missing host", sitemap_url)))?;

    let domain = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(SiteOrigin {
        scheme: url.scheme().to_string(),
        domain,
    })
}

/// An override host is an authority only: `name` or `name:port`
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.contains("://") || host.contains('/') || host.contains('?') {
        return Err(ConfigError::Validation(format!(
            "host must be a bare host[:port], got '{}'",
            host
        )));
    }

    // Url accepts the authority only if it is well-formed
    Url::parse(&format!("http://{}/", host))
        .map_err(|e| ConfigError::Validation(format!("invalid host '{}': {}", host, e)))?;

    Ok(())
}
