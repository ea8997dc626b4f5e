//! Rakuten Ichiba API configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::adapter::http::HttpConfig;

/// Upper bound the item search API accepts for `hits`.
pub const MAX_HITS: u32 = 30;

/// Environment variables checked for the application id, in order.
pub const APPLICATION_ID_VARS: [&str; 3] = [
    "RAKUTEN_APPLICATION_ID",
    "RAKUTEN_APP_ID",
    "RAKUTEN_API_KEY",
];

/// `[rakuten]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RakutenConfig {
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_ranking_url")]
    pub ranking_url: String,
    /// Results requested per search; the cheapest is used.
    #[serde(default = "default_hits")]
    pub hits: u32,
    /// Minimum spacing between requests in milliseconds.
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,
    /// Shipping assumed for listings whose price excludes postage.
    #[serde(default)]
    pub assumed_shipping: Decimal,
    #[serde(default)]
    pub http: HttpConfig,
    /// Loaded from the environment, never from the file.
    #[serde(skip)]
    pub application_id: Option<String>,
}

fn default_search_url() -> String {
    "https://app.rakuten.co.jp/services/api/IchibaItem/Search/20220601".into()
}

fn default_ranking_url() -> String {
    "https://app.rakuten.co.jp/services/api/IchibaItem/Ranking/20220601".into()
}

const fn default_hits() -> u32 {
    1
}

const fn default_request_interval_ms() -> u64 {
    1_000
}

impl Default for RakutenConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            ranking_url: default_ranking_url(),
            hits: default_hits(),
            request_interval_ms: default_request_interval_ms(),
            assumed_shipping: Decimal::ZERO,
            http: HttpConfig::default(),
            application_id: None,
        }
    }
}
