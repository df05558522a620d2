//! Bounded-concurrency request dispatch
//!
//! With a ceiling of 1 targets are probed strictly in order with long gaps
//! and a periodic pause. With a higher ceiling every target gets its own task,
//! admitted through a semaphore and staggered by [`Pacing`]. Finished tasks
//! send their outcome over a channel to a single collector, so no result list
//! is shared between tasks.

use crate::config::RunConfig;
use crate::output::Reporter;
use crate::warmer::fetcher::Fetcher;
use crate::warmer::outcome::{ProbeRequest, RequestError, RequestOutcome};
use crate::warmer::pacing::Pacing;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// Probes every target exactly once and returns one outcome per target
///
/// Outcomes are in completion order, not target order. Failed requests are
/// returned as error outcomes and never retried; nothing here aborts the run.
///
/// # Arguments
///
/// * `targets` - Request URLs, in sitemap order
/// * `config` - Concurrency ceiling, pacing, timeout and headers
/// * `fetcher` - Transport used for every request
/// * `reporter` - Receives debug lines for failed requests
pub async fn dispatch(
    targets: Vec<String>,
    config: &RunConfig,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn Reporter>,
) -> Vec<RequestOutcome> {
    tracing::debug!(
        "Dispatching {} requests (concurrency {}, delay {:?})",
        targets.len(),
        config.concurrency,
        config.delay
    );

    if config.concurrency <= 1 {
        dispatch_sequential(targets, config, fetcher, reporter).await
    } else {
        dispatch_parallel(targets, config, fetcher, reporter).await
    }
}

async fn dispatch_sequential(
    targets: Vec<String>,
    config: &RunConfig,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn Reporter>,
) -> Vec<RequestOutcome> {
    let pacing = Pacing::new(config.delay);
    let headers = config.probe_headers();
    let total = targets.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, url) in targets.into_iter().enumerate() {
        let delay = pacing.sequential_delay(index);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        // Each request runs in its own task; a panic becomes an Aborted outcome
        let task = tokio::spawn(request_target(
            Arc::clone(&fetcher),
            url.clone(),
            headers.clone(),
            config.timeout,
        ));
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Request task for {} failed: {}", url, e);
                aborted(url)
            }
        };
        report_failure(reporter.as_ref(), &outcome);
        outcomes.push(outcome);

        let completed = index + 1;
        if let Some(pause) = Pacing::batch_pause(completed) {
            reporter.debug(&format!(
                "[DEBUG] Processed {}/{} URLs, pausing {}s...",
                completed,
                total,
                pause.as_secs()
            ));
            tokio::time::sleep(pause).await;
        }
    }

    outcomes
}

async fn dispatch_parallel(
    targets: Vec<String>,
    config: &RunConfig,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn Reporter>,
) -> Vec<RequestOutcome> {
    let pacing = Pacing::new(config.delay);
    let headers = Arc::new(config.probe_headers());
    let permits = config
        .concurrency
        .min(targets.len())
        .clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, RequestOutcome)>();

    for (index, url) in targets.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let fetcher = Arc::clone(&fetcher);
        let reporter = Arc::clone(&reporter);
        let headers = Arc::clone(&headers);
        let tx = tx.clone();
        let timeout = config.timeout;

        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };

            tokio::time::sleep(pacing.parallel_delay(index)).await;

            let headers = headers.as_ref().clone();
            let outcome = request_target(fetcher, url, headers, timeout).await;
            report_failure(reporter.as_ref(), &outcome);

            // The collector outlives every sender
            let _ = tx.send((index, outcome));
        });
    }
    drop(tx);

    let mut reported = vec![false; targets.len()];
    let mut outcomes = Vec::with_capacity(targets.len());
    while let Some((index, outcome)) = rx.recv().await {
        reported[index] = true;
        outcomes.push(outcome);
    }

    // A task that panicked dropped its sender without reporting
    for (url, done) in targets.into_iter().zip(reported) {
        if !done {
            tracing::warn!("Request task for {} ended without an outcome", url);
            outcomes.push(aborted(url));
        }
    }

    outcomes
}

async fn request_target(
    fetcher: Arc<dyn Fetcher>,
    url: String,
    headers: Vec<(String, String)>,
    timeout: Duration,
) -> RequestOutcome {
    let request = ProbeRequest {
        method: Method::GET,
        url: url.clone(),
        headers,
        timeout,
    };

    RequestOutcome {
        url,
        response: fetcher.fetch(request).await,
    }
}

fn aborted(url: String) -> RequestOutcome {
    let error = RequestError::Aborted("task ended without reporting".to_string());
    RequestOutcome::failure(url, error)
}

fn report_failure(reporter: &dyn Reporter, outcome: &RequestOutcome) {
    if let Some(error) = outcome.error() {
        reporter.debug(&format!(
            "[DEBUG] Request failed: {}, {}",
            outcome.url, error
        ));
    }
}
