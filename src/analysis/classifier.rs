//! Cache-status classification of probe outcomes

use crate::warmer::RequestOutcome;
use std::fmt;

/// How the cache layer answered one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// Served from cache
    Hit,

    /// Not cached yet (or expired); this request populated the cache
    Miss,

    /// Header present but neither hit nor miss, e.g. `BYPASS` or `DYNAMIC`
    Uncacheable,

    /// The cache-status header was not in the response
    MissingHeader,

    /// The request itself failed
    Exception,
}

impl CacheStatus {
    /// Every category, in summary order
    pub const ALL: [CacheStatus; 5] = [
        Self::Hit,
        Self::Miss,
        Self::Uncacheable,
        Self::MissingHeader,
        Self::Exception,
    ];

    /// Classifies a header value that was found in the response
    ///
    /// Matching is by substring on the uppercased value, so `"Hit, stale"`
    /// and `"TCP_HIT"` are hits and `"Expired"` is a miss.
    pub fn from_header_value(value: &str) -> Self {
        let upper = value.to_uppercase();
        if upper.contains("HIT") {
            Self::Hit
        } else if upper.contains("MISS") || upper.contains("EXPIRED") {
            Self::Miss
        } else {
            Self::Uncacheable
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Uncacheable => "none",
            Self::MissingHeader => "missing-header",
            Self::Exception => "exception",
        };
        write!(f, "{}", name)
    }
}

/// Classifies one outcome by its cache-status header
///
/// A failed request is always an [`CacheStatus::Exception`]. Otherwise `None`
/// is returned when `header_name` is empty: classification is disabled and the
/// caller skips the outcome. Multiple values of the header are joined with
/// `", "` before matching.
///
/// # Example
///
/// ```
/// use precache::analysis::{classify, CacheStatus};
/// use precache::warmer::{ProbeResponse, RequestOutcome};
///
/// let outcome = RequestOutcome::success(
///     "https://example.com/",
///     ProbeResponse::new(200).with_header("x-cache", "Hit from cloudfront"),
/// );
/// assert_eq!(classify(&outcome, "X-Cache"), Some(CacheStatus::Hit));
/// assert_eq!(classify(&outcome, ""), None);
/// ```
pub fn classify(outcome: &RequestOutcome, header_name: &str) -> Option<CacheStatus> {
    let response = match &outcome.response {
        Ok(response) => response,
        Err(_) => return Some(CacheStatus::Exception),
    };

    if header_name.is_empty() {
        return None;
    }

    let status = match response.header(header_name) {
        Some((_, values)) => CacheStatus::from_header_value(&values.join(", ")),
        None => CacheStatus::MissingHeader,
    };
    Some(status)
}
