//! Warm run coordinator
//!
//! Ties the pipeline together: fetch the sitemap, extract and rewrite target
//! URLs, dispatch the probes, then classify and summarise the outcomes.

use crate::analysis::{aggregate, ClassificationCounts};
use crate::config::RunConfig;
use crate::output::{print_banner, print_summary, report_outcomes, Reporter};
use crate::sitemap::{extract_targets, HostRewriter};
use crate::warmer::dispatcher::dispatch;
use crate::warmer::fetcher::Fetcher;
use crate::warmer::outcome::RequestOutcome;
use crate::PrecacheError;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// One outcome per target, in completion order
    pub outcomes: Vec<RequestOutcome>,

    /// Per-category counts (all zero without a cache header)
    pub counts: ClassificationCounts,

    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Number of probed pages
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Runs one warm pass over a sitemap
pub struct Warmer {
    config: Arc<RunConfig>,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn Reporter>,
    rewriter: HostRewriter,
}

impl Warmer {
    pub fn new(config: RunConfig, fetcher: Arc<dyn Fetcher>, reporter: Arc<dyn Reporter>) -> Self {
        let rewriter = HostRewriter::new(config.origin.clone(), config.host.clone());
        Self {
            config: Arc::new(config),
            fetcher,
            reporter,
            rewriter,
        }
    }

    /// Runs the whole pipeline
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Every target was probed (individual failures included)
    /// * `Err(PrecacheError)` - The sitemap could not be fetched or held no URLs;
    ///   no probe was sent
    pub async fn run(&self) -> Result<RunSummary, PrecacheError> {
        let started_at = Local::now();
        let start = Instant::now();
        print_banner(self.reporter.as_ref(), &self.config, started_at);

        let targets = self.discover().await?;
        let extracted = targets.len();
        self.reporter
            .success(&format!("Extracted {} URLs from the sitemap", extracted));
        tracing::info!("Warming {} URLs", extracted);

        let outcomes = dispatch(
            targets,
            &self.config,
            Arc::clone(&self.fetcher),
            Arc::clone(&self.reporter),
        )
        .await;

        let header_name = self.config.cache_header_name();
        report_outcomes(
            self.reporter.as_ref(),
            &outcomes,
            header_name,
            &self.rewriter,
        );
        let counts = aggregate(&outcomes, header_name);

        let summary = RunSummary {
            outcomes,
            counts,
            started_at,
            finished_at: Local::now(),
            elapsed: start.elapsed(),
        };
        print_summary(self.reporter.as_ref(), &summary, &self.config);
        tracing::info!(
            "Warm run finished: {} pages in {:?}",
            summary.total(),
            summary.elapsed
        );

        Ok(summary)
    }

    /// Fetches the sitemap and turns it into request URLs
    async fn discover(&self) -> Result<Vec<String>, PrecacheError> {
        let sitemap_url = &self.config.sitemap_url;
        self.reporter
            .normal(&format!("Fetching sitemap: {}", sitemap_url));

        let headers = [("User-Agent".to_string(), self.config.user_agent.clone())];
        let document = self
            .fetcher
            .fetch_document(sitemap_url, &headers, self.config.timeout)
            .await?;

        self.reporter.normal("Sitemap fetched.");
        self.reporter.normal("Parsing sitemap...");

        extract_targets(
            &document,
            sitemap_url,
            &self.rewriter,
            self.reporter.as_ref(),
        )
    }
}
