//! Sitemap handling: URL discovery and host rewriting
//!
//! This module turns a fetched sitemap document into the ordered list of
//! request URLs a warm run will probe.

mod extractor;
mod rewriter;

pub use extractor::{extract, parse_urlset, scan_loc_fragments, DocumentParseError, Extraction};
pub use rewriter::HostRewriter;

use crate::output::Reporter;
use crate::PrecacheError;

/// Extracts, reports and rewrites the target URLs of a sitemap document
///
/// A strict-parse failure is reported as a warning, skipped entries at debug
/// level. Finding no URLs at all is fatal for the run.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Request URLs in document order
/// * `Err(PrecacheError::EmptyExtraction)` - Neither stage found any URL
pub fn extract_targets(
    document: &str,
    sitemap_url: &str,
    rewriter: &HostRewriter,
    reporter: &dyn Reporter,
) -> Result<Vec<String>, PrecacheError> {
    let extraction = extract(document);

    if let Extraction::Lenient { reason, .. } = &extraction {
        reporter.warning(&format!(
            "Failed to parse sitemap as XML ({}), falling back to <loc> text scan...",
            reason
        ));
    }

    for fragment in extraction.skipped() {
        reporter.debug(&format!(
            "[DEBUG] Skipped entry without a URL: {}",
            fragment
        ));
    }

    let targets: Vec<String> = extraction
        .into_urls()
        .iter()
        .map(|raw| {
            let target = rewriter.rewrite(raw);
            reporter.debug(&format!("[DEBUG] Extracted URL: {}", target));
            target
        })
        .collect();

    if targets.is_empty() {
        return Err(PrecacheError::EmptyExtraction {
            url: sitemap_url.to_string(),
        });
    }

    tracing::debug!("Extracted {} target URLs", targets.len());
    Ok(targets)
}
