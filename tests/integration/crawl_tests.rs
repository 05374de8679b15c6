//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the pricing site and run the full
//! discovery, crawl, storage and checkpoint cycle end-to-end.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tld_price_crawler::config::{Config, ZoneCandidates};
use tld_price_crawler::crawler::{run_crawl, Coordinator, HttpFetcher, NoDelay};
use tld_price_crawler::output::{JsonCheckpointStore, CRAWL_STATS_FILE, REGISTRARS_FILE};
use tld_price_crawler::state::ZoneOutcome;
use tld_price_crawler::storage::{RunStatus, SqliteStorage, Storage};
use tld_price_crawler::CrawlerError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A price row as the listing site renders it
fn row(slug: &str, name: &str, registration: &str, renewal: &str, transfer: &str) -> String {
    format!(
        r#"<tr>
            <td><a href="/registrar/{slug}"><img src="/logo/{slug}.png"> {name}</a></td>
            <td><div class="price">{registration}</div></td>
            <td><div class="price">{renewal}</div></td>
            <td><div class="price">{transfer}</div></td>
            <td><a href="https://www.{slug}.com/" target="_blank">官网</a></td>
        </tr>"#
    )
}

fn listing_page(rows: &[String], has_next: bool) -> String {
    let pager = if has_next {
        r##"<ul class="pagination"><li><a href="#">1</a></li><li><a href="#">下一页</a></li></ul>"##
    } else {
        r##"<ul class="pagination"><li><a href="#">1</a></li></ul>"##
    };
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>域名价格</title></head>
        <body>
            <table class="table">
                <thead><tr><th>注册商</th><th>注册</th><th>续费</th><th>转入</th><th></th></tr></thead>
                <tbody>{}</tbody>
            </table>
            {}
        </body></html>"#,
        rows.join("\n"),
        pager
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=utf-8")
}

async fn mount_probe(server: &MockServer, zone: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(format!("/domain/{}", zone)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, zone: &str, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/domain/{}/{}", zone, page)))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a small site: .com over two pages, .io on one page, .xxx empty
async fn mount_site(server: &MockServer) {
    mount_probe(server, "com", 200).await;
    mount_probe(server, "io", 200).await;
    mount_probe(server, "xxx", 200).await;

    mount_page(
        server,
        "com",
        1,
        html(listing_page(
            &[
                row("spaceship", "Spaceship", "5.62 美元", "9.98 美元", "9.98 美元"),
                row("porkbun", "Porkbun", "$10.37", "$10.37", "--"),
            ],
            true,
        )),
    )
    .await;
    mount_page(
        server,
        "com",
        2,
        html(listing_page(
            &[row("aliyun", "阿里云", "69 元", "79 元", "79 元")],
            false,
        )),
    )
    .await;
    mount_page(
        server,
        "io",
        1,
        html(listing_page(
            &[row("spaceship", "Spaceship", "28.98 美元", "45.98 美元", "N/A")],
            false,
        )),
    )
    .await;
    mount_page(server, "xxx", 1, html(listing_page(&[], false))).await;
}

fn test_config(base_url: &str, dir: &Path, zones: &[&str]) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = base_url.to_string();
    config.crawler.probe_delay_ms = 0;
    config.crawler.page_delay_ms = 0;
    config.crawler.zone_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.crawler.probe_timeout_secs = 5;
    config.user_agent.user_agent = "TestCrawler/1.0".to_string();
    config.output.database_path = dir.join("db").join("pricing.db").display().to_string();
    config.output.checkpoint_dir = dir.join("data").display().to_string();
    config.output.summary_path = dir.join("data").join("summary.md").display().to_string();
    config.zones = ZoneCandidates {
        general: zones.iter().map(|z| z.to_string()).collect(),
        new_gtld: vec![],
        country_code: vec![],
        other: vec![],
    };
    config
}

fn open_db(config: &Config) -> SqliteStorage {
    SqliteStorage::new(Path::new(&config.output.database_path)).unwrap()
}

fn coordinator(config: Config) -> Coordinator {
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .unwrap();
    let storage = open_db(&config);
    let store = JsonCheckpointStore::new(&config.output.checkpoint_dir);
    Coordinator::with_components(
        config,
        "integration".to_string(),
        Arc::new(fetcher),
        Arc::new(NoDelay),
        storage,
        Box::new(store),
    )
}

#[tokio::test]
async fn test_full_crawl_against_listing_site() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), &["com", "io", "xxx", "museum"]);

    let report = run_crawl(config.clone(), "integration".to_string())
        .await
        .unwrap();

    assert_eq!(report.stats.total_zones, 3);
    assert_eq!(report.stats.successful_zones, 2);
    assert_eq!(report.stats.failed_zones, 1);
    assert_eq!(report.total_records, 4);
    assert_eq!(report.saved_records, 4);

    let storage = open_db(&config);
    assert_eq!(storage.count_prices().unwrap(), 4);
    assert_eq!(storage.count_distinct_zones().unwrap(), 2);
    assert_eq!(storage.count_distinct_registrars().unwrap(), 3);

    let spaceship = storage.get_price("com", "spaceship").unwrap().unwrap();
    assert_eq!(spaceship.registrar_name, "Spaceship");
    assert_eq!(spaceship.registrar_url, "https://www.spaceship.com/");
    assert_eq!(spaceship.registration_price.as_deref(), Some("5.62"));
    assert_eq!(spaceship.currency, "usd");
    assert_eq!(spaceship.source, "nazhumi_web");

    let aliyun = storage.get_price("com", "aliyun").unwrap().unwrap();
    assert_eq!(aliyun.registration_price.as_deref(), Some("69"));
    assert_eq!(aliyun.currency, "cny");
    assert_eq!(aliyun.currency_name, "人民币");

    let io = storage.get_price("io", "spaceship").unwrap().unwrap();
    assert!(io.transfer_price.is_none());

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    let crawls = storage.get_zone_crawls(run.id).unwrap();
    assert_eq!(crawls.len(), 3);
    assert_eq!(crawls[0].pages_fetched, 2);
    assert_eq!(crawls[2].outcome, ZoneOutcome::Empty);

    let data_dir = dir.path().join("data");
    let registrars: Vec<String> = serde_json::from_str(
        &std::fs::read_to_string(data_dir.join(REGISTRARS_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(registrars, vec!["aliyun", "porkbun", "spaceship"]);

    let stats: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(data_dir.join(CRAWL_STATS_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(stats["registrar_stats"]["spaceship"]["supported_zones"], 2);
    assert_eq!(stats["failed_zone_list"], serde_json::json!(["xxx"]));

    let summary = std::fs::read_to_string(data_dir.join("summary.md")).unwrap();
    assert!(summary.contains("- **Failed Zones**: 1"));
}

#[tokio::test]
async fn test_rerun_updates_rows_in_place() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), &["com", "io"]);

    coordinator(config.clone()).run().await.unwrap();
    let first = open_db(&config).get_price("io", "spaceship").unwrap().unwrap();

    coordinator(config.clone()).run().await.unwrap();
    let storage = open_db(&config);
    let second = storage.get_price("io", "spaceship").unwrap().unwrap();

    assert_eq!(storage.count_prices().unwrap(), 4);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[tokio::test]
async fn test_no_verified_zones() {
    let server = MockServer::start().await;
    mount_probe(&server, "com", 404).await;
    mount_probe(&server, "net", 503).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), &["com", "net"]);

    let result = coordinator(config.clone()).run().await;
    assert!(matches!(
        result,
        Err(CrawlerError::NoZonesVerified { candidates: 2 })
    ));

    let run = open_db(&config).get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Aborted);
}

#[tokio::test]
async fn test_server_errors_stay_within_zone() {
    let server = MockServer::start().await;
    mount_probe(&server, "de", 200).await;
    mount_probe(&server, "fr", 200).await;
    mount_probe(&server, "nl", 200).await;

    // .de fails outright, .fr fails on its second page, .nl succeeds
    mount_page(&server, "de", 1, ResponseTemplate::new(500)).await;
    mount_page(
        &server,
        "fr",
        1,
        html(listing_page(&[row("ovh", "OVHcloud", "€6.99", "€8.99", "€8.99")], true)),
    )
    .await;
    mount_page(&server, "fr", 2, ResponseTemplate::new(502)).await;
    mount_page(
        &server,
        "nl",
        1,
        html(listing_page(&[row("transip", "TransIP", "£7.50", "£9.00", "--")], false)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), &["de", "fr", "nl"]);

    let mut coordinator = coordinator(config);
    let report = coordinator.run().await.unwrap();

    let failed: Vec<&str> = report
        .stats
        .failed_zone_list
        .iter()
        .map(|z| z.as_str())
        .collect();
    assert_eq!(failed, vec!["de", "fr"]);
    assert_eq!(report.stats.successful_zones, 1);
    assert_eq!(report.total_records, 1);

    let storage = coordinator.storage();
    assert!(storage.get_price("fr", "ovh").unwrap().is_none());
    let transip = storage.get_price("nl", "transip").unwrap().unwrap();
    assert_eq!(transip.currency, "gbp");
    assert_eq!(transip.registration_price.as_deref(), Some("7.50"));

    let run = storage.get_latest_run().unwrap().unwrap();
    let outcomes: Vec<ZoneOutcome> = storage
        .get_zone_crawls(run.id)
        .unwrap()
        .into_iter()
        .map(|c| c.outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ZoneOutcome::FetchFailed,
            ZoneOutcome::FetchFailed,
            ZoneOutcome::Complete
        ]
    );
}
