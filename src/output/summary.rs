//! Human-readable run banner, per-page lines and final statistics

use crate::analysis::{classify, CacheStatus};
use crate::config::RunConfig;
use crate::output::reporter::Reporter;
use crate::sitemap::HostRewriter;
use crate::warmer::{RequestOutcome, RunSummary};
use chrono::{DateTime, Local};

const SEPARATOR: &str = "---------------------------------------------------------";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const RERUN_HINT: &str = "Run again in a few minutes to confirm the cache now serves them";

const CACHE_HEADER_TIP: &str =
    "Tip: name the cache-status header for hit/miss statistics, e.g. --cacheheader=x-cache";

/// Prints the run settings before any network activity
pub fn print_banner(reporter: &dyn Reporter, config: &RunConfig, started_at: DateTime<Local>) {
    reporter.notice(&format!("Start time: {}", started_at.format(TIME_FORMAT)));
    reporter.normal(&format!("Sitemap: {}", config.sitemap_url));
    if let Some(host) = &config.host {
        reporter.normal(&format!("Override host: {}", host));
    }
    reporter.normal(&format!("Concurrency: {}", config.concurrency));
    reporter.normal(&format!("Timeout: {}s", config.timeout.as_secs()));
    reporter.normal(&format!(
        "Cache header: {}",
        config.cache_header.as_deref().unwrap_or("(none)")
    ));
    reporter.normal(&format!("User agent: {}", config.user_agent));
    reporter.info("Warm-up started:");
    reporter.normal(SEPARATOR);
}

/// Reports each page whose cache state deserves attention
///
/// Hits and failed requests are not listed; failures were already reported
/// at debug level by the dispatcher. URLs are shown with the sitemap's own
/// domain even when requests went to an override host.
pub fn report_outcomes(
    reporter: &dyn Reporter,
    outcomes: &[RequestOutcome],
    header_name: &str,
    rewriter: &HostRewriter,
) {
    if header_name.is_empty() {
        return;
    }

    for outcome in outcomes {
        let Ok(response) = &outcome.response else {
            continue;
        };
        let display_url = rewriter.restore(&outcome.url);
        let found = response
            .header(header_name)
            .map(|(name, values)| format!("{}: {}", name, values.join(", ")));

        match (classify(outcome, header_name), found) {
            (Some(CacheStatus::Miss), Some(header)) => {
                reporter.success(&format!("Cacheable page: {} ({})", display_url, header))
            }
            (Some(CacheStatus::Uncacheable), Some(header)) => {
                reporter.error(&format!("Uncacheable page: {} ({})", display_url, header))
            }
            (Some(CacheStatus::MissingHeader), _) => {
                reporter.warning(&format!("Missing cache header: {}", display_url))
            }
            _ => {}
        }
    }
}

/// Prints the final statistics of a run
pub fn print_summary(reporter: &dyn Reporter, summary: &RunSummary, config: &RunConfig) {
    let counts = &summary.counts;

    reporter.normal(SEPARATOR);
    reporter.info(&format!(
        "Warm-up finished: {} pages in {}s",
        summary.total(),
        summary.elapsed.as_secs()
    ));
    reporter.notice(&format!(
        "End time: {}",
        summary.finished_at.format(TIME_FORMAT)
    ));

    if counts.hit > 0 {
        reporter.success(&format!("Already cached: {}", counts.hit));
    }
    if counts.miss > 0 {
        reporter.info(&format!("Warmed by this run: {}", counts.miss));
    }
    if counts.uncacheable > 0 {
        reporter.error(&format!("Uncacheable: {}", counts.uncacheable));
    }
    if counts.exception > 0 {
        reporter.error(&format!("Failed requests: {}", counts.exception));
    }
    if counts.missing_header > 0 {
        reporter.warning(&format!("Missing cache header: {}", counts.missing_header));
    }

    match (counts.hit_rate(), &config.cache_header) {
        (Some(rate), _) => {
            reporter.normal(SEPARATOR);
            reporter.success(&format!(
                "Cache hit rate: {:.1}% ({}/{})",
                rate,
                counts.hit,
                counts.cacheable()
            ));
            if counts.miss > 0 {
                reporter.info(&format!(
                    "This run triggered cache fills for {} pages",
                    counts.miss
                ));
                reporter.warning(RERUN_HINT);
            }
        }
        (None, Some(header)) => reporter.warning(&format!(
            "No response carried a hit/miss value in {}; is the cache header name right?",
            header
        )),
        (None, None) => reporter.normal(CACHE_HEADER_TIP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ClassificationCounts;
    use crate::config::{load_config, PartialConfig, SiteOrigin};
    use crate::output::{Level, MemoryReporter};
    use crate::warmer::{ProbeResponse, RequestError};
    use std::time::Duration;

    fn config(cache_header: Option<&str>, host: Option<&str>) -> RunConfig {
        load_config(
            None,
            PartialConfig {
                sitemap: Some("https://example.com/sitemap.xml".to_string()),
                cache_header: cache_header.map(str::to_string),
                host: host.map(str::to_string),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn summary(counts: ClassificationCounts) -> RunSummary {
        let now = Local::now();
        RunSummary {
            outcomes: Vec::new(),
            counts,
            started_at: now,
            finished_at: now,
            elapsed: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_banner_mentions_override_host() {
        let reporter = MemoryReporter::new(false);
        print_banner(&reporter, &config(None, Some("10.0.0.1")), Local::now());

        let normal = reporter.messages(Level::Normal);
        assert!(normal.iter().any(|m| m == "Override host: 10.0.0.1"));
        assert!(normal.iter().any(|m| m == "Cache header: (none)"));
        assert_eq!(reporter.messages(Level::Notice).len(), 1);
    }

    #[test]
    fn test_summary_with_hit_rate() {
        let reporter = MemoryReporter::new(false);
        let counts = ClassificationCounts {
            hit: 3,
            miss: 1,
            exception: 2,
            ..Default::default()
        };
        print_summary(&reporter, &summary(counts), &config(Some("x-cache"), None));

        let success = reporter.messages(Level::Success);
        assert!(success.contains(&"Cache hit rate: 75.0% (3/4)".to_string()));
        assert!(reporter
            .messages(Level::Error)
            .contains(&"Failed requests: 2".to_string()));
        assert!(!reporter
            .messages(Level::Warning)
            .iter()
            .any(|m| m.contains("cache header name")));
    }

    #[test]
    fn test_summary_hints() {
        let reporter = MemoryReporter::new(false);
        let counts = ClassificationCounts {
            missing_header: 4,
            ..Default::default()
        };
        print_summary(&reporter, &summary(counts), &config(Some("x-cache"), None));
        assert!(reporter
            .messages(Level::Warning)
            .iter()
            .any(|m| m.contains("x-cache")));

        let reporter = MemoryReporter::new(false);
        print_summary(
            &reporter,
            &summary(ClassificationCounts::default()),
            &config(None, None),
        );
        assert!(reporter
            .messages(Level::Normal)
            .iter()
            .any(|m| m.contains("--cacheheader")));
    }

    #[test]
    fn test_report_outcomes() {
        let reporter = MemoryReporter::new(false);
        let rewriter = HostRewriter::new(
            SiteOrigin {
                scheme: "https".to_string(),
                domain: "example.com".to_string(),
            },
            Some("10.0.0.1".to_string()),
        );
        let outcomes = vec![
            RequestOutcome::success(
                "https://10.0.0.1/hit",
                ProbeResponse::new(200).with_header("x-cache", "HIT"),
            ),
            RequestOutcome::success(
                "https://10.0.0.1/miss",
                ProbeResponse::new(200).with_header("x-cache", "MISS"),
            ),
            RequestOutcome::success(
                "https://10.0.0.1/dyn",
                ProbeResponse::new(200).with_header("x-cache", "DYNAMIC"),
            ),
            RequestOutcome::success("https://10.0.0.1/bare", ProbeResponse::new(200)),
            RequestOutcome::failure("https://10.0.0.1/down", RequestError::Timeout),
        ];

        report_outcomes(&reporter, &outcomes, "X-Cache", &rewriter);

        assert_eq!(
            reporter.lines(),
            vec![
                (
                    Level::Success,
                    "Cacheable page: https://example.com/miss (x-cache: MISS)".to_string()
                ),
                (
                    Level::Error,
                    "Uncacheable page: https://example.com/dyn (x-cache: DYNAMIC)".to_string()
                ),
                (
                    Level::Warning,
                    "Missing cache header: https://example.com/bare".to_string()
                ),
            ]
        );

        let quiet = MemoryReporter::new(false);
        report_outcomes(&quiet, &outcomes, "", &rewriter);
        assert!(quiet.lines().is_empty());
    }
}
