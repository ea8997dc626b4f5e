//! In-memory ports and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use sedori::domain::{Asin, Listing, ListingQuery, ProductStats};
use sedori::error::{ApiError, Result};
use sedori::port::{Marketplace, ProductCatalog};

pub fn asin(raw: &str) -> Asin {
    Asin::parse(raw).expect("test ASIN")
}

/// A product Amazon is not selling itself, ranked well, with a sell price.
pub fn product(raw_asin: &str, title: &str, sell_price: Decimal) -> ProductStats {
    let mut product = ProductStats::new(asin(raw_asin), title);
    product.expected_sell_price = Some(sell_price);
    product.avg_rank_90d = Some(12_000);
    product
}

pub fn listing(name: &str, price: Decimal, shipping: Decimal) -> Listing {
    Listing {
        name: name.to_string(),
        price,
        shipping,
        url: format!("https://item.rakuten.co.jp/shop/{}", name.replace(' ', "-")),
        shop_name: Some("test shop".into()),
        rank: None,
    }
}

/// Catalog answering from fixed maps. ASINs in `failing` return an error.
#[derive(Default)]
pub struct FakeCatalog {
    pub by_asin: HashMap<String, ProductStats>,
    pub by_keyword: HashMap<String, ProductStats>,
    pub failing: Vec<String>,
    pub searches: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_product(mut self, product: ProductStats) -> Self {
        self.by_asin.insert(product.asin.to_string(), product);
        self
    }

    pub fn with_keyword(mut self, keyword: &str, product: ProductStats) -> Self {
        self.by_keyword.insert(keyword.to_string(), product);
        self
    }

    pub fn failing_on(mut self, raw_asin: &str) -> Self {
        self.failing.push(raw_asin.to_string());
        self
    }

    pub fn searched(&self) -> Vec<String> {
        self.searches.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProductCatalog for FakeCatalog {
    async fn product(&self, asin: &Asin) -> Result<Option<ProductStats>> {
        if self.failing.iter().any(|a| a == asin.as_str()) {
            return Err(ApiError::Rejected {
                service: "fake",
                status: 500,
                message: "boom".into(),
            }
            .into());
        }
        Ok(self.by_asin.get(asin.as_str()).cloned())
    }

    async fn search(&self, keyword: &str) -> Result<Option<ProductStats>> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(keyword.to_string());
        }
        Ok(self.by_keyword.get(keyword).cloned())
    }

    fn name(&self) -> &'static str {
        "fake-catalog"
    }
}

/// Marketplace answering from fixed maps keyed by keyword or JAN.
#[derive(Default)]
pub struct FakeMarketplace {
    pub offers: HashMap<String, Listing>,
    pub rankings: HashMap<String, Vec<Listing>>,
    pub disabled: bool,
    pub queries: Mutex<Vec<ListingQuery>>,
}

impl FakeMarketplace {
    pub fn with_offer(mut self, term: &str, listing: Listing) -> Self {
        self.offers.insert(term.to_string(), listing);
        self
    }

    pub fn with_ranking(mut self, genre_id: &str, listings: Vec<Listing>) -> Self {
        self.rankings.insert(genre_id.to_string(), listings);
        self
    }

    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn queried(&self) -> Vec<ListingQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Marketplace for FakeMarketplace {
    async fn cheapest(&self, query: &ListingQuery) -> Result<Option<Listing>> {
        if self.disabled {
            return Ok(None);
        }
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        Ok(self.offers.get(query.keyword_text()).cloned())
    }

    async fn ranking(&self, genre_id: &str) -> Result<Vec<Listing>> {
        if self.disabled {
            return Ok(Vec::new());
        }
        Ok(self.rankings.get(genre_id).cloned().unwrap_or_default())
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn name(&self) -> &'static str {
        "fake-marketplace"
    }
}
