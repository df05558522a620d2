//! Host rewriting for staging or origin-direct runs

use crate::config::SiteOrigin;
use url::Url;

/// Sends discovered URLs to an override host while keeping their path and query
///
/// The scheme always comes from the sitemap URL, not from each entry, so a
/// sitemap that mixes `http` and `https` entries is still probed consistently.
#[derive(Debug, Clone)]
pub struct HostRewriter {
    origin: SiteOrigin,
    override_host: Option<String>,
}

impl HostRewriter {
    pub fn new(origin: SiteOrigin, override_host: Option<String>) -> Self {
        Self {
            origin,
            override_host,
        }
    }

    /// Rewrites one URL
    ///
    /// Returns `raw` unchanged when no override host is set or when `raw`
    /// does not parse as a URL.
    ///
    /// # Example
    ///
    /// ```
    /// use precache::config::SiteOrigin;
    /// use precache::sitemap::HostRewriter;
    ///
    /// let origin = SiteOrigin { scheme: "https".into(), domain: "example.com".into() };
    /// let rewriter = HostRewriter::new(origin, Some("127.0.0.1:8080".into()));
    /// assert_eq!(
    ///     rewriter.rewrite("https://example.com/a/b?x=1"),
    ///     "https://127.0.0.1:8080/a/b?x=1"
    /// );
    /// ```
    pub fn rewrite(&self, raw: &str) -> String {
        let Some(host) = &self.override_host else {
            return raw.to_string();
        };

        let Ok(parsed) = Url::parse(raw) else {
            tracing::debug!("Leaving unparseable URL as-is: {}", raw);
            return raw.to_string();
        };

        let mut rewritten = format!("{}://{}{}", self.origin.scheme, host, parsed.path());
        if let Some(query) = parsed.query() {
            rewritten.push('?');
            rewritten.push_str(query);
        }
        rewritten
    }

    /// Maps a rewritten URL back to the sitemap's domain for display
    pub fn restore(&self, url: &str) -> String {
        match &self.override_host {
            Some(host) => url.replacen(host.as_str(), &self.origin.domain, 1),
            None => url.to_string(),
        }
    }
}
