//! Response analysis: cache-status classification and aggregate counts

mod classifier;
mod stats;

pub use classifier::{classify, CacheStatus};
pub use stats::{aggregate, ClassificationCounts};
