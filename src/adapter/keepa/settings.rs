//! Keepa API configuration.

use serde::Deserialize;

use crate::adapter::http::HttpConfig;

/// Keepa domain id for amazon.co.jp.
pub const DOMAIN_JP: u8 = 5;

/// Keys shorter than this are almost certainly pasted wrong.
pub const MIN_KEY_LEN: usize = 10;

/// `[keepa]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct KeepaConfig {
    /// REST base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Keepa domain id (5 = amazon.co.jp).
    #[serde(default = "default_domain")]
    pub domain: u8,
    /// Days of history the stats block covers.
    #[serde(default = "default_stats_days")]
    pub stats_days: u32,
    /// Minimum spacing between requests in milliseconds.
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,
    /// Seller id Amazon itself uses in buy box statistics.
    #[serde(default = "default_amazon_seller_id")]
    pub amazon_seller_id: String,
    #[serde(default)]
    pub http: HttpConfig,
    /// Loaded from `KEEPA_API_KEY`, never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_api_url() -> String {
    "https://api.keepa.com".into()
}

const fn default_domain() -> u8 {
    DOMAIN_JP
}

const fn default_stats_days() -> u32 {
    90
}

const fn default_request_interval_ms() -> u64 {
    3_000
}

fn default_amazon_seller_id() -> String {
    "AN1VRQENFRJN5".into()
}

impl Default for KeepaConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            domain: default_domain(),
            stats_days: default_stats_days(),
            request_interval_ms: default_request_interval_ms(),
            amazon_seller_id: default_amazon_seller_id(),
            http: HttpConfig::default(),
            api_key: None,
        }
    }
}
