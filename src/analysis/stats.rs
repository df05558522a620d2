//! Aggregate cache statistics for a warm run

use crate::analysis::classifier::{classify, CacheStatus};
use crate::warmer::RequestOutcome;

/// Per-category outcome counts
///
/// When a cache-status header is configured the five counters partition the
/// outcome set: their sum equals the number of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationCounts {
    pub hit: u64,
    pub miss: u64,
    pub uncacheable: u64,
    pub missing_header: u64,
    pub exception: u64,
}

impl ClassificationCounts {
    /// Returns a copy with the counter for `status` incremented
    pub fn record(self, status: CacheStatus) -> Self {
        let mut next = self;
        match status {
            CacheStatus::Hit => next.hit += 1,
            CacheStatus::Miss => next.miss += 1,
            CacheStatus::Uncacheable => next.uncacheable += 1,
            CacheStatus::MissingHeader => next.missing_header += 1,
            CacheStatus::Exception => next.exception += 1,
        }
        next
    }

    pub fn get(&self, status: CacheStatus) -> u64 {
        match status {
            CacheStatus::Hit => self.hit,
            CacheStatus::Miss => self.miss,
            CacheStatus::Uncacheable => self.uncacheable,
            CacheStatus::MissingHeader => self.missing_header,
            CacheStatus::Exception => self.exception,
        }
    }

    /// Sum of all five counters
    pub fn total(&self) -> u64 {
        self.hit + self.miss + self.uncacheable + self.missing_header + self.exception
    }

    /// Pages the cache can store: hits plus misses
    pub fn cacheable(&self) -> u64 {
        self.hit + self.miss
    }

    /// `hit / (hit + miss) * 100`, or `None` when nothing was cacheable
    pub fn hit_rate(&self) -> Option<f64> {
        let cacheable = self.cacheable();
        if cacheable == 0 {
            return None;
        }
        Some(self.hit as f64 / cacheable as f64 * 100.0)
    }
}

/// Folds outcomes into per-category counts
///
/// Order-independent; an empty `header_name` disables classification and
/// yields all-zero counts.
///
/// # Example
///
/// ```
/// use precache::analysis::aggregate;
/// use precache::warmer::{ProbeResponse, RequestError, RequestOutcome};
///
/// let outcomes = vec![
///     RequestOutcome::success("https://example.com/a", ProbeResponse::new(200).with_header("x-cache", "HIT")),
///     RequestOutcome::success("https://example.com/b", ProbeResponse::new(200).with_header("x-cache", "MISS")),
///     RequestOutcome::failure("https://example.com/c", RequestError::Timeout),
/// ];
/// let counts = aggregate(&outcomes, "x-cache");
/// assert_eq!((counts.hit, counts.miss, counts.exception), (1, 1, 1));
/// assert_eq!(counts.hit_rate(), Some(50.0));
/// ```
pub fn aggregate(outcomes: &[RequestOutcome], header_name: &str) -> ClassificationCounts {
    if header_name.is_empty() {
        return ClassificationCounts::default();
    }

    outcomes
        .iter()
        .filter_map(|outcome| classify(outcome, header_name))
        .fold(
            ClassificationCounts::default(),
            ClassificationCounts::record,
        )
}
