use serde::{Deserialize, Serialize};

/// Main configuration structure
///
/// Every section and key has a default, so an empty file (or no file at all)
/// yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub zones: ZoneCandidates,
}

/// Crawl pacing and source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Root of the pricing site; listings live under `/domain/<zone>/<page>`
    pub base_url: String,

    /// Delay after each zone existence probe (milliseconds)
    pub probe_delay_ms: u64,

    /// Delay between pages of the same zone (milliseconds)
    pub page_delay_ms: u64,

    /// Delay between zones (milliseconds)
    pub zone_delay_ms: u64,

    /// Write a checkpoint after every N zones
    pub checkpoint_every: usize,

    /// Timeout for page fetches (seconds)
    pub request_timeout_secs: u64,

    /// Timeout for existence probes (seconds)
    pub probe_timeout_secs: u64,

    /// Upper bound on listing pages fetched for one zone
    pub max_pages: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nazhumi.com".to_string(),
            probe_delay_ms: 500,
            page_delay_ms: 1000,
            zone_delay_ms: 2000,
            checkpoint_every: 10,
            request_timeout_secs: 30,
            probe_timeout_secs: 10,
            max_pages: 100,
        }
    }
}

/// Identifying headers sent with every request
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Directory receiving the JSON checkpoint artifacts
    pub checkpoint_dir: String,

    /// Path to the markdown summary file
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./data/pricing.db".to_string(),
            checkpoint_dir: "./data".to_string(),
            summary_path: "./data/crawl_summary.md".to_string(),
        }
    }
}

/// Candidate zones probed during discovery, grouped by category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ZoneCandidates {
    pub general: Vec<String>,
    pub new_gtld: Vec<String>,
    pub country_code: Vec<String>,
    /// Popular zones outside the other groups, probed last
    pub other: Vec<String>,
}

impl ZoneCandidates {
    /// All candidates in probe order: general, new gTLDs, country codes, other
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.general
            .iter()
            .chain(&self.new_gtld)
            .chain(&self.country_code)
            .chain(&self.other)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.general.len() + self.new_gtld.len() + self.country_code.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ZoneCandidates {
    fn default() -> Self {
        Self {
            general: strings(&[
                "com", "net", "org", "info", "biz", "name", "pro", "mobi", "travel", "jobs",
                "tel", "asia", "xxx", "cat", "coop", "museum", "aero", "int", "post",
            ]),
            new_gtld: strings(&[
                "xyz", "top", "online", "site", "tech", "store", "blog", "news", "cloud",
                "space", "website", "live", "studio", "design", "art", "shop", "digital",
                "email", "host", "domains",
            ]),
            country_code: strings(&[
                "cn", "com.cn", "net.cn", "org.cn", "gov.cn", "uk", "co.uk", "org.uk", "me.uk",
                "de", "fr", "it", "es", "nl", "ca", "au", "jp", "kr", "in", "br", "mx", "ru",
                "pl", "se", "no", "dk", "fi", "be", "ch", "at", "ie", "pt", "gr", "cz", "hk",
                "tw", "sg", "my", "th", "ph", "id", "vn", "ae", "sa",
            ]),
            other: strings(&["io", "co", "ai", "app", "dev", "me", "tv", "cc", "ws"]),
        }
    }
}
