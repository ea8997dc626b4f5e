//! Keepa product API client.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::dto::{ProductDto, ProductResponse, StatsDto, AMAZON, BUY_BOX_SHIPPING, NEW, SALES};
use super::settings::{KeepaConfig, DOMAIN_JP, MIN_KEY_LEN};
use crate::adapter::http::HttpTransport;
use crate::domain::{Asin, Dimensions, Jan, ProductStats, Yen};
use crate::error::{ApiError, ConfigError, Result};
use crate::port::ProductCatalog;

const SERVICE: &str = "keepa";

/// [`ProductCatalog`] backed by the Keepa REST API.
pub struct KeepaClient {
    transport: HttpTransport,
    config: KeepaConfig,
    api_key: String,
}

impl KeepaClient {
    /// Build a client; fails when no API key was configured.
    pub fn new(config: KeepaConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: "KEEPA_API_KEY",
            })?;

        debug!(domain = config.domain, key_len = api_key.len(), "Keepa client configured");
        if api_key.len() < MIN_KEY_LEN {
            warn!(key_len = api_key.len(), "Keepa API key looks too short, check KEEPA_API_KEY");
        }

        let transport = HttpTransport::new(
            SERVICE,
            &config.http,
            Duration::from_millis(config.request_interval_ms),
        );

        Ok(Self {
            transport,
            config,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_url.trim_end_matches('/'))
    }

    async fn fetch(&self, path: &str, extra: &[(&'static str, String)]) -> Result<Option<ProductDto>> {
        let mut query = vec![
            ("key", self.api_key.clone()),
            ("domain", self.config.domain.to_string()),
            ("stats", self.config.stats_days.to_string()),
            ("buybox", "1".to_string()),
        ];
        query.extend(extra.iter().cloned());

        let raw = self.transport.get(&self.endpoint(path), &query).await?;
        let parsed = serde_json::from_str::<ProductResponse>(&raw.body);

        if !raw.status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.error)
                .map(|e| format!("{}: {}", e.kind, e.message))
                .unwrap_or_else(|| truncate(&raw.body, 200));
            return Err(ApiError::Rejected {
                service: SERVICE,
                status: raw.status.as_u16(),
                message,
            }
            .into());
        }

        let response = parsed.map_err(|e| ApiError::Decode {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        if let Some(error) = response.error {
            return Err(ApiError::Rejected {
                service: SERVICE,
                status: raw.status.as_u16(),
                message: format!("{}: {}", error.kind, error.message),
            }
            .into());
        }

        if let Some(tokens) = response.tokens_left {
            debug!(tokens_left = tokens, "Keepa tokens remaining");
        }

        Ok(response.products.into_iter().next())
    }

    fn to_stats(&self, dto: ProductDto) -> Option<ProductStats> {
        map_product(dto, self.config.domain, &self.config.amazon_seller_id)
    }
}

#[async_trait]
impl ProductCatalog for KeepaClient {
    async fn product(&self, asin: &Asin) -> Result<Option<ProductStats>> {
        let dto = self
            .fetch("product", &[("asin", asin.to_string()), ("history", "0".into())])
            .await?;
        let Some(dto) = dto else {
            warn!(asin = %asin, "Keepa returned no product");
            return Ok(None);
        };
        Ok(self.to_stats(dto))
    }

    async fn search(&self, keyword: &str) -> Result<Option<ProductStats>> {
        let term = keyword.trim();
        if term.is_empty() {
            return Ok(None);
        }
        let dto = self
            .fetch("search", &[("type", "product".into()), ("term", term.to_string())])
            .await?;
        let Some(dto) = dto else {
            info!(keyword = term, "No Keepa match for keyword");
            return Ok(None);
        };
        Ok(self.to_stats(dto))
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

/// Reduce a Keepa product to the fields the selection rules use.
///
/// Returns `None` when the payload carries no usable ASIN.
#[must_use]
pub fn map_product(dto: ProductDto, domain: u8, amazon_seller_id: &str) -> Option<ProductStats> {
    let asin = match Asin::parse(&dto.asin) {
        Ok(asin) => asin,
        Err(err) => {
            warn!(error = %err, "Skipping Keepa product with malformed ASIN");
            return None;
        }
    };

    let mut product = ProductStats::new(asin, dto.title.clone().unwrap_or_default());
    let stats = dto.stats.clone().unwrap_or_default();
    let price = |v: i64| to_yen(v, domain);

    product.avg_rank_90d = StatsDto::at(stats.average(), SALES).and_then(|v| u64::try_from(v).ok());
    product.expected_sell_price = stats
        .buy_box_price
        .filter(|v| *v > 0)
        .or_else(|| StatsDto::at(&stats.current, BUY_BOX_SHIPPING))
        .or_else(|| StatsDto::at(&stats.current, NEW))
        .or_else(|| StatsDto::at(stats.average(), BUY_BOX_SHIPPING))
        .map(price);
    product.buybox_is_amazon = stats.buy_box_is_amazon.unwrap_or(false);
    product.amazon_current = StatsDto::at(&stats.current, AMAZON).map(price);
    product.amazon_presence_ratio = stats
        .out_of_stock_percentage90
        .get(AMAZON)
        .copied()
        .flatten()
        .filter(|pct| (0..=100).contains(pct))
        .map(|pct| Decimal::ONE - Decimal::from(pct) / Decimal::ONE_HUNDRED);
    product.amazon_buybox_share = stats
        .buy_box_stats
        .as_ref()
        .and_then(|sellers| sellers.get(amazon_seller_id))
        .and_then(|s| s.percentage_won)
        .and_then(|pct| Decimal::try_from(pct).ok())
        .map(|pct| pct / Decimal::ONE_HUNDRED);

    product.weight_kg = dto
        .package_weight
        .filter(|g| *g > 0)
        .map(|g| Decimal::from(g) / Decimal::ONE_THOUSAND);
    product.dimensions_cm = match (dto.package_length, dto.package_width, dto.package_height) {
        (Some(l), Some(w), Some(h)) if l > 0 && w > 0 && h > 0 => {
            Some(Dimensions::new(mm_to_cm(l), mm_to_cm(w), mm_to_cm(h)))
        }
        _ => None,
    };
    product.jan = dto
        .ean_list
        .as_deref()
        .and_then(|codes| codes.iter().find_map(|c| Jan::parse(c).ok()));
    product.category = dto
        .category_tree
        .as_deref()
        .and_then(|tree| tree.first())
        .map(|node| node.name.clone());

    Some(product)
}

fn to_yen(value: i64, domain: u8) -> Yen {
    if domain == DOMAIN_JP {
        Decimal::from(value)
    } else {
        Decimal::new(value, 2)
    }
}

fn mm_to_cm(mm: i64) -> Decimal {
    Decimal::new(mm, 1)
}

fn truncate(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SELLER: &str = "AN1VRQENFRJN5";

    fn product_json(stats: serde_json::Value) -> ProductDto {
        serde_json::from_value(serde_json::json!({
            "asin": "B00TEST001",
            "title": "Gaming Mouse",
            "stats": stats,
            "packageWeight": 250,
            "packageLength": 200,
            "packageWidth": 100,
            "packageHeight": 50,
            "eanList": ["4988601012345"],
            "categoryTree": [{"name": "家電&カメラ"}, {"name": "マウス"}]
        }))
        .unwrap()
    }

    fn current(values: &[(usize, i64)]) -> Vec<i64> {
        let mut series = vec![-1; 19];
        for (i, v) in values {
            series[*i] = *v;
        }
        series
    }

    // -------------------------------------------------------------------------
    // Mapping
    // -------------------------------------------------------------------------

    #[test]
    fn maps_rank_price_and_package() {
        let dto = product_json(serde_json::json!({
            "current": current(&[(AMAZON, 2980), (NEW, 2700)]),
            "avg90": current(&[(SALES, 15000)]),
            "buyBoxPrice": 3100,
            "buyBoxIsAmazon": false,
            "outOfStockPercentage90": [25, 0],
            "buyBoxStats": { "AN1VRQENFRJN5": { "percentageWon": 40.0 } }
        }));

        let p = map_product(dto, DOMAIN_JP, SELLER).unwrap();
        assert_eq!(p.title, "Gaming Mouse");
        assert_eq!(p.avg_rank_90d, Some(15_000));
        assert_eq!(p.expected_sell_price, Some(dec!(3100)));
        assert_eq!(p.amazon_current, Some(dec!(2980)));
        assert_eq!(p.amazon_presence_ratio, Some(dec!(0.75)));
        assert_eq!(p.amazon_buybox_share, Some(dec!(0.4)));
        assert_eq!(p.weight_kg, Some(dec!(0.25)));
        assert_eq!(p.dimensions_cm.map(|d| d.sum()), Some(dec!(35)));
        assert_eq!(p.jan.map(|j| j.to_string()), Some("4988601012345".into()));
        assert_eq!(p.category.as_deref(), Some("家電&カメラ"));
    }

    #[test]
    fn sell_price_falls_back_through_series() {
        let shipping = product_json(serde_json::json!({
            "current": current(&[(BUY_BOX_SHIPPING, 3300), (NEW, 2700)]),
            "buyBoxPrice": -1
        }));
        assert_eq!(
            map_product(shipping, DOMAIN_JP, SELLER).unwrap().expected_sell_price,
            Some(dec!(3300))
        );

        let new_only = product_json(serde_json::json!({ "current": current(&[(NEW, 2700)]) }));
        assert_eq!(
            map_product(new_only, DOMAIN_JP, SELLER).unwrap().expected_sell_price,
            Some(dec!(2700))
        );

        let avg_only = product_json(serde_json::json!({
            "current": current(&[]),
            "avg": current(&[(BUY_BOX_SHIPPING, 2500)])
        }));
        assert_eq!(
            map_product(avg_only, DOMAIN_JP, SELLER).unwrap().expected_sell_price,
            Some(dec!(2500))
        );
    }

    #[test]
    fn missing_values_stay_none() {
        let dto = product_json(serde_json::json!({ "current": current(&[]) }));
        let p = map_product(dto, DOMAIN_JP, SELLER).unwrap();
        assert_eq!(p.avg_rank_90d, None);
        assert_eq!(p.expected_sell_price, None);
        assert_eq!(p.amazon_current, None);
        assert_eq!(p.amazon_presence_ratio, None);
        assert_eq!(p.amazon_buybox_share, None);
        assert!(!p.buybox_is_amazon);
    }

    #[test]
    fn non_jp_domain_prices_are_cents() {
        let dto = product_json(serde_json::json!({ "buyBoxPrice": 1999 }));
        let p = map_product(dto, 1, SELLER).unwrap();
        assert_eq!(p.expected_sell_price, Some(dec!(19.99)));
    }

    #[test]
    fn product_without_stats_maps_identity_only() {
        let dto: ProductDto = serde_json::from_value(serde_json::json!({ "asin": "b00test001" })).unwrap();
        let p = map_product(dto, DOMAIN_JP, SELLER).unwrap();
        assert_eq!(p.asin.as_str(), "B00TEST001");
        assert!(p.title.is_empty());
        assert_eq!(p.dimensions_cm, None);
    }

    #[test]
    fn malformed_asin_is_dropped() {
        let dto: ProductDto = serde_json::from_value(serde_json::json!({ "asin": "??" })).unwrap();
        assert!(map_product(dto, DOMAIN_JP, SELLER).is_none());
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn new_requires_api_key() {
        let result = KeepaClient::new(KeepaConfig::default());
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::MissingField {
                field: "KEEPA_API_KEY"
            }))
        ));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let config = KeepaConfig {
            api_url: "http://localhost:1234/".into(),
            api_key: Some("0123456789abcdef".into()),
            ..KeepaConfig::default()
        };
        let client = KeepaClient::new(config).unwrap();
        assert_eq!(client.endpoint("product"), "http://localhost:1234/product");
        assert_eq!(client.name(), "keepa");
    }
}
