//! Integration tests for the warmer
//!
//! These tests use wiremock to stand in for a site behind a cache and run
//! the full pipeline end-to-end with the real HTTP fetcher.

use precache::config::{load_config, PartialConfig, RunConfig};
use precache::output::{Level, MemoryReporter, Reporter};
use precache::warmer::{warm, RequestError};
use precache::PrecacheError;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMPTY_URLSET: &str = "<urlset></urlset>";

/// Creates a fast test configuration for the given sitemap URL
fn create_test_config(sitemap: String, size: usize, host: Option<String>) -> RunConfig {
    load_config(
        None,
        PartialConfig {
            sitemap: Some(sitemap),
            size: Some(size),
            delay: Some(0),
            timeout: Some(1),
            host,
            cache_header: Some("X-Cache".to_string()),
            user_agent: Some("TestWarmer/1.0".to_string()),
            ..Default::default()
        },
    )
    .expect("valid test config")
}

fn sitemap_of(base_url: &str, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base_url, p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

async fn mount_page(server: &MockServer, page: &str, cache: Option<&str>) {
    let mut response = ResponseTemplate::new(200).set_body_string("<html></html>");
    if let Some(value) = cache {
        response = response.insert_header("x-cache", value);
    }
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_warm_run() {
    for size in [1, 4] {
        let server = MockServer::start().await;
        let base_url = server.uri();

        let pages = ["/hit", "/miss", "/expired", "/dynamic", "/bare"];
        let sitemap = sitemap_of(&base_url, &pages);
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .and(header("user-agent", "TestWarmer/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
            .expect(1)
            .mount(&server)
            .await;

        mount_page(&server, "/hit", Some("HIT")).await;
        mount_page(&server, "/miss", Some("MISS")).await;
        mount_page(&server, "/expired", Some("Expired")).await;
        mount_page(&server, "/dynamic", Some("DYNAMIC")).await;
        mount_page(&server, "/bare", None).await;

        let reporter = Arc::new(MemoryReporter::new(false));
        let config = create_test_config(format!("{}/sitemap.xml", base_url), size, None);

        let summary = warm(config, reporter.clone() as Arc<dyn Reporter>)
            .await
            .expect("warm run failed");

        assert_eq!(summary.total(), 5, "size {}", size);
        assert_eq!(summary.counts.hit, 1);
        assert_eq!(summary.counts.miss, 2);
        assert_eq!(summary.counts.uncacheable, 1);
        assert_eq!(summary.counts.missing_header, 1);
        assert_eq!(summary.counts.exception, 0);
        assert_eq!(summary.counts.total(), 5);

        let hit_rate = summary.counts.hit_rate().expect("hit rate");
        assert!((hit_rate - 100.0 / 3.0).abs() < 1e-9);

        assert!(reporter
            .messages(Level::Success)
            .iter()
            .any(|m| m.starts_with("Cache hit rate: 33.3%")));
        // wiremock verifies the `expect(1)` counts when the server drops
    }
}

#[tokio::test]
async fn test_fallback_extraction_and_host_override() {
    let server = MockServer::start().await;
    let port = server.address().port();
    let site_domain = format!("localhost:{}", port);
    let override_host = format!("127.0.0.1:{}", port);

    // Broken XML whose entries point at the public site
    let body = r#"<urlset><url><loc>http://www.example.com/page?id=7</loc></url>
        <url><loc>not-a-url</loc></url></urlset"#;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    // Requests go to the override host but keep the sitemap's domain as Host
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("host", site_domain.as_str()))
        .respond_with(ResponseTemplate::new(200).insert_header("x-cache", "MISS"))
        .expect(1)
        .mount(&server)
        .await;

    let reporter = Arc::new(MemoryReporter::new(true));
    let config = create_test_config(
        format!("http://{}/sitemap.xml", site_domain),
        2,
        Some(override_host.clone()),
    );

    let summary = warm(config, reporter.clone() as Arc<dyn Reporter>)
        .await
        .expect("warm run failed");

    assert_eq!(summary.total(), 1);
    let expected_url = format!("http://{}/page?id=7", override_host);
    assert_eq!(summary.outcomes[0].url, expected_url);
    assert_eq!(summary.counts.miss, 1);

    let cacheable = format!("Cacheable page: http://{}/page?id=7", site_domain);
    assert!(reporter
        .messages(Level::Success)
        .iter()
        .any(|m| m.starts_with(&cacheable)));
    assert!(reporter
        .messages(Level::Warning)
        .iter()
        .any(|m| m.contains("falling back")));
    assert!(reporter
        .messages(Level::Debug)
        .iter()
        .any(|m| m.contains("not-a-url")));
}

#[tokio::test]
async fn test_empty_sitemap_sends_no_probes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_URLSET))
        .mount(&server)
        .await;

    let reporter: Arc<dyn Reporter> = Arc::new(MemoryReporter::new(false));
    let config = create_test_config(format!("{}/sitemap.xml", server.uri()), 5, None);

    let result = warm(config, reporter).await;
    assert!(matches!(result, Err(PrecacheError::EmptyExtraction { .. })));

    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/sitemap.xml");
}

#[tokio::test]
async fn test_sitemap_http_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let reporter: Arc<dyn Reporter> = Arc::new(MemoryReporter::new(false));
    let config = create_test_config(format!("{}/sitemap.xml", server.uri()), 5, None);

    let result = warm(config, reporter).await;
    assert!(matches!(
        result,
        Err(PrecacheError::DocumentStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_slow_page_times_out_without_stopping_others() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let sitemap = sitemap_of(&base_url, &["/fast", "/slow"]);
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&server)
        .await;
    mount_page(&server, "/fast", Some("HIT")).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-cache", "HIT")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let reporter: Arc<dyn Reporter> = Arc::new(MemoryReporter::new(false));
    let config = create_test_config(format!("{}/sitemap.xml", base_url), 2, None);

    let summary = warm(config, reporter).await.expect("warm run failed");

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.counts.hit, 1);
    assert_eq!(summary.counts.exception, 1);

    let slow = summary
        .outcomes
        .iter()
        .find(|o| o.url.ends_with("/slow"))
        .expect("slow outcome");
    assert_eq!(slow.error(), Some(&RequestError::Timeout));
}
