//! Two-stage sitemap URL extraction
//!
//! The strict stage reads the document as a `<urlset>` sitemap with a real XML
//! parser. Sitemaps in the wild are often slightly broken (stray tags,
//! truncated output from a plugin, wrong root), so when the strict stage fails
//! the lenient stage scans the raw text for `<loc>` fragments instead.
//!
//! Both stages are pure functions of the document text.

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// `<loc>...</loc>` fragments, across newlines, any case
static LOC_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc\s*>(.*?)</loc\s*>").expect("valid regex"));

/// First absolute http(s) URL inside a fragment
static ABSOLUTE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"']+"#).expect("valid regex"));

/// Why the strict stage rejected a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentParseError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("expected <urlset> root element, found <{0}>")]
    UnexpectedRoot(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document ended inside <{0}>")]
    Unclosed(String),
}

/// Outcome of URL extraction, tagged by the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The document parsed as a `<urlset>` sitemap
    Structured {
        /// `loc` values in document order
        urls: Vec<String>,
        /// `loc` elements that were empty
        skipped: Vec<String>,
    },

    /// The strict parse failed and `<loc>` fragments were scanned instead
    Lenient {
        /// URLs found in fragments, in document order
        urls: Vec<String>,
        /// Fragments without an absolute URL
        skipped: Vec<String>,
        /// Why the strict parse failed
        reason: DocumentParseError,
    },
}

impl Extraction {
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Structured { urls, .. } | Self::Lenient { urls, .. } => urls,
        }
    }

    pub fn skipped(&self) -> &[String] {
        match self {
            Self::Structured { skipped, .. } | Self::Lenient { skipped, .. } => skipped,
        }
    }

    pub fn is_lenient(&self) -> bool {
        matches!(self, Self::Lenient { .. })
    }

    pub fn into_urls(self) -> Vec<String> {
        match self {
            Self::Structured { urls, .. } | Self::Lenient { urls, .. } => urls,
        }
    }
}

/// Extracts page URLs from a sitemap document
///
/// Tries the strict parser first and falls back to the lenient scanner only
/// when the strict parser rejects the document.
///
/// # Example
///
/// ```
/// use precache::sitemap::extract;
///
/// let xml = "<urlset><url><loc>https://example.com/p</loc></url></urlset>";
/// let extraction = extract(xml);
/// assert!(!extraction.is_lenient());
/// assert_eq!(extraction.urls(), ["https://example.com/p"]);
/// ```
pub fn extract(document: &str) -> Extraction {
    match parse_urlset(document) {
        Ok((urls, skipped)) => Extraction::Structured { urls, skipped },
        Err(reason) => {
            let (urls, skipped) = scan_loc_fragments(document);
            Extraction::Lenient {
                urls,
                skipped,
                reason,
            }
        }
    }
}

/// Strict stage: a well-formed document with a `<urlset>` root
pub fn parse_urlset(document: &str) -> Result<(Vec<String>, Vec<String>), DocumentParseError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut skipped = Vec::new();

    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                if !seen_root {
                    if name != "urlset" {
                        return Err(DocumentParseError::UnexpectedRoot(name));
                    }
                    seen_root = true;
                }

                // urlset > url > loc
                if name == "loc" && open.len() == 2 && open[1] == "url" {
                    current_loc = Some(String::new());
                }
                open.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if !seen_root {
                    // An empty root element is still the wrong root unless it is <urlset/>
                    if name != "urlset" {
                        return Err(DocumentParseError::UnexpectedRoot(name));
                    }
                    seen_root = true;
                }
                if name == "loc" && open.len() == 2 && open[1] == "url" {
                    skipped.push("<loc/>".to_string());
                }
            }
            Ok(Event::End(_)) => {
                let name = open.pop().unwrap_or_default();
                if name == "loc" {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if loc.is_empty() {
                            skipped.push("<loc></loc>".to_string());
                        } else {
                            urls.push(loc.to_string());
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| DocumentParseError::Xml(e.to_string()))?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentParseError::Xml(e.to_string())),
            _ => {}
        }
    }

    if !seen_root {
        return Err(DocumentParseError::NoRoot);
    }
    if let Some(name) = open.pop() {
        return Err(DocumentParseError::Unclosed(name));
    }

    Ok((urls, skipped))
}

/// Lenient stage: scan raw text for `<loc>` fragments
///
/// Each fragment is handled on its own; one without an absolute URL is
/// returned in the skipped list and does not affect the others.
pub fn scan_loc_fragments(document: &str) -> (Vec<String>, Vec<String>) {
    let mut urls = Vec::new();
    let mut skipped = Vec::new();

    for caps in LOC_FRAGMENT_RE.captures_iter(document) {
        let fragment = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let inner = strip_cdata(inner.trim());

        match ABSOLUTE_URL_RE.find(inner) {
            Some(m) => {
                let raw = m.as_str();
                let url = quick_xml::escape::unescape(raw)
                    .map(|u| u.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                urls.push(url);
            }
            None => skipped.push(fragment.to_string()),
        }
    }

    (urls, skipped)
}

/// The content of a `<![CDATA[ ... ]]>` wrapper, or `text` itself
fn strip_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .unwrap_or(text)
}
