//! Warmer module: request dispatch and run orchestration
//!
//! This module contains the core warm-up logic, including:
//! - The `Fetcher` transport seam and its `reqwest` implementation
//! - Pacing and jitter arithmetic
//! - Sequential and bounded-parallel dispatch
//! - Overall run coordination

mod coordinator;
mod dispatcher;
mod fetcher;
mod outcome;
mod pacing;

pub use coordinator::{RunSummary, Warmer};
pub use dispatcher::dispatch;
pub use fetcher::{build_http_client, classify_error, Fetcher, HttpFetcher};
pub use outcome::{ProbeRequest, ProbeResponse, RequestError, RequestOutcome};
pub use pacing::{Pacing, BATCH_PAUSE, BATCH_SIZE, JITTER_CYCLE, JITTER_STEP};

use crate::config::RunConfig;
use crate::output::Reporter;
use crate::PrecacheError;
use std::sync::Arc;

/// Runs a complete warm pass with the `reqwest` fetcher
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `reporter` - Where progress and summary lines go
///
/// # Returns
///
/// * `Ok(RunSummary)` - All targets were probed
/// * `Err(PrecacheError)` - The client could not be built, or the sitemap
///   could not be fetched or held no URLs
pub async fn warm(
    config: RunConfig,
    reporter: Arc<dyn Reporter>,
) -> Result<RunSummary, PrecacheError> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config)?);
    Warmer::new(config, fetcher, reporter).run().await
}
