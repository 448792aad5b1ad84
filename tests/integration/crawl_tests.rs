//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ripple_crawl::config::Config;
use ripple_crawl::crawler::crawl;
use ripple_crawl::output::{csv_output_path, CrawlStats, CsvSink};
use ripple_crawl::{CrawlCoordinator, CrawlRecord, HostPolicy, MemorySink};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given worker count
fn create_test_config(max_tasks: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_tasks = max_tasks;
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body.into(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(hits)
        .mount(server)
        .await;
}

async fn run_crawl(root: &str, max_tasks: usize, sink: Arc<MemorySink>) -> CrawlStats {
    timeout(
        Duration::from_secs(20),
        crawl(create_test_config(max_tasks), root, sink),
    )
    .await
    .expect("crawl should terminate")
    .expect("crawl should succeed")
}

fn sorted_records(sink: &MemorySink) -> Vec<CrawlRecord> {
    let mut records = sink.records();
    records.sort_by(|a, b| a.url.cmp(&b.url));
    records
}

/// Returns a localhost port with nothing listening on it
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

#[tokio::test]
async fn test_equivalent_links_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html(format!(
            r#"<a href="/about">About</a>
               <a href="{}/about">About (absolute)</a>
               <a href="/about#team">Team</a>"#,
            base
        )),
        1,
    )
    .await;
    mount_page(&server, "/about", html(r#"<a href="/">Home</a>"#), 1).await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 10, sink.clone()).await;

    assert!(!stats.interrupted);
    assert_eq!(stats.urls_visited, 2);
    assert_eq!(
        sorted_records(&sink),
        vec![
            CrawlRecord::new(format!("{}/", base), 200),
            CrawlRecord::new(format!("{}/about", base), 200),
        ]
    );
}

#[tokio::test]
async fn test_off_site_links_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    let port = Url::parse(&base).unwrap().port().unwrap();

    // "localhost" reaches the same server but is a different host spelling
    mount_page(
        &server,
        "/",
        html(format!(
            r#"<a href="http://evil.com/x">Evil</a>
               <a href="http://localhost:{}/elsewhere">Alias</a>
               <a href="ftp://127.0.0.1/file">FTP</a>
               <a href="/local">Local</a>"#,
            port
        )),
        1,
    )
    .await;
    mount_page(&server, "/local", html("<p>leaf</p>"), 1).await;
    mount_page(&server, "/elsewhere", html("<p>never</p>"), 0).await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 4, sink.clone()).await;

    assert_eq!(stats.urls_visited, 2);
    assert_eq!(stats.links_rejected, 3);
    assert!(sink
        .records()
        .iter()
        .all(|record| record.url.starts_with(&base)));
}

#[tokio::test]
async fn test_redirect_recorded_and_target_enqueued_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html(r#"<a href="/old">Old</a><a href="/new">New</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/new"),
        1,
    )
    .await;
    mount_page(&server, "/new", html("<p>moved</p>"), 1).await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 3, sink.clone()).await;

    assert_eq!(stats.redirects, 1);
    assert_eq!(
        sink.records_for(&format!("{}/old", base)),
        vec![CrawlRecord::new(format!("{}/old", base), 301)]
    );
    assert_eq!(sink.records_for(&format!("{}/new", base)).len(), 1);
}

#[tokio::test]
async fn test_redirect_loop_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        ResponseTemplate::new(302).insert_header("location", "/loop"),
        1,
    )
    .await;
    mount_page(
        &server,
        "/loop",
        ResponseTemplate::new(307).insert_header("location", "/"),
        1,
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 2, sink.clone()).await;

    assert_eq!(stats.redirects, 2);
    assert_eq!(
        sorted_records(&sink),
        vec![
            CrawlRecord::new(format!("{}/", base), 302),
            CrawlRecord::new(format!("{}/loop", base), 307),
        ]
    );
}

#[tokio::test]
async fn test_off_site_redirect_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        ResponseTemplate::new(301).insert_header("location", "http://evil.com/landing"),
        1,
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 2, sink.clone()).await;

    assert_eq!(stats.urls_visited, 1);
    assert_eq!(stats.links_rejected, 1);
    assert_eq!(
        sink.records(),
        vec![CrawlRecord::new(format!("{}/", base), 301)]
    );
}

#[test]
fn test_www_toggle_accepts_apex_links() {
    let root = Url::parse("http://www.example.com/").unwrap();
    let policy = HostPolicy::new(&root).unwrap();
    let link = Url::parse("http://example.com/page").unwrap();

    assert!(policy.allowed(&link));
    assert_eq!(policy.allowed(&link), policy.allowed(&link));
}

#[tokio::test]
async fn test_transport_error_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dead = format!("http://127.0.0.1:{}/gone", closed_port());

    mount_page(
        &server,
        "/",
        html(format!(
            r#"<a href="{}">Dead</a><a href="/after">After</a>"#,
            dead
        )),
        1,
    )
    .await;
    mount_page(&server, "/after", html("<p>still crawled</p>"), 1).await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 2, sink.clone()).await;

    assert_eq!(stats.urls_visited, 3);
    assert_eq!(stats.transport_errors, 1);
    assert!(sink.records_for(&dead).is_empty());
    assert_eq!(sink.records_for(&format!("{}/after", base)).len(), 1);
}

/// Mounts a five-page site and returns its server
async fn small_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a", html(r#"<a href="/a/1">A1</a><a href="/b">B</a>"#), 1).await;
    mount_page(&server, "/b", html(r#"<a href="/b/1">B1</a><a href="/">Home</a>"#), 1).await;
    mount_page(&server, "/a/1", html("<p>leaf</p>"), 1).await;
    mount_page(&server, "/b/1", ResponseTemplate::new(404), 1).await;

    server
}

fn paths_and_statuses(sink: &MemorySink) -> Vec<(String, u16)> {
    let mut found: Vec<(String, u16)> = sink
        .records()
        .into_iter()
        .map(|record| (Url::parse(&record.url).unwrap().path().to_string(), record.status))
        .collect();
    found.sort();
    found
}

#[tokio::test]
async fn test_single_worker_completes_site() {
    let server = small_site().await;
    let single = Arc::new(MemorySink::new());
    let stats = run_crawl(&server.uri(), 1, single.clone()).await;

    assert_eq!(stats.urls_visited, 5);
    assert_eq!(stats.responses, 5);
    assert_eq!(
        paths_and_statuses(&single),
        vec![
            ("/".to_string(), 200),
            ("/a".to_string(), 200),
            ("/a/1".to_string(), 200),
            ("/b".to_string(), 200),
            ("/b/1".to_string(), 404),
        ]
    );

    // A wider pool finds the same set of URLs
    let server = small_site().await;
    let wide = Arc::new(MemorySink::new());
    run_crawl(&server.uri(), 8, wide.clone()).await;
    assert_eq!(paths_and_statuses(&single), paths_and_statuses(&wide));
}

#[tokio::test]
async fn test_non_html_pages_not_scanned() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html(r#"<a href="/data.txt">Data</a><a href="/feed.xml">Feed</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/data.txt",
        ResponseTemplate::new(200)
            .set_body_raw(r#"href="/hidden""#, "text/plain"),
        1,
    )
    .await;
    mount_page(
        &server,
        "/feed.xml",
        ResponseTemplate::new(200)
            .set_body_raw(r#"<link href="/from-feed"/>"#, "application/xml"),
        1,
    )
    .await;
    mount_page(&server, "/from-feed", html("<p>found via xml</p>"), 1).await;
    mount_page(&server, "/hidden", html("<p>never</p>"), 0).await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&base, 3, sink.clone()).await;

    assert_eq!(stats.urls_visited, 4);
    assert_eq!(stats.pages_parsed, 3);
}

#[tokio::test]
async fn test_bare_host_root() {
    let server = MockServer::start().await;
    let bare = server.uri().trim_start_matches("http://").to_string();

    mount_page(&server, "/", html("<p>home</p>"), 1).await;

    let sink = Arc::new(MemorySink::new());
    let stats = run_crawl(&bare, 1, sink.clone()).await;

    assert_eq!(stats.root, format!("{}/", server.uri()));
    assert_eq!(stats.responses, 1);
}

#[tokio::test]
async fn test_csv_output_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html(r#"<a href="/missing">x</a>"#), 1).await;
    mount_page(&server, "/missing", ResponseTemplate::new(404), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = csv_output_path(dir.path().join("crawl").to_str().unwrap());
    let sink = Arc::new(CsvSink::create(&output).unwrap());

    let coordinator = CrawlCoordinator::new(create_test_config(2), sink).unwrap();
    timeout(Duration::from_secs(20), coordinator.crawl(&base))
        .await
        .expect("crawl should terminate")
        .unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    let mut lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.remove(0), "URL,Status Code");
    lines.sort_unstable();

    let root_line = format!("{}/,200", base);
    let missing_line = format!("{}/missing,404", base);
    assert_eq!(lines, vec![root_line.as_str(), missing_line.as_str()]);
}
