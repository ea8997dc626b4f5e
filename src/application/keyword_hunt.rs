//! Keyword hunt: fixed search terms → Keepa → market gates → Rakuten → profit.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::report::{Progress, Report, NOT_ON_KEEPA, NOT_ON_RAKUTEN};
use crate::domain::money::whole_yen;
use crate::domain::{Asin, BuyOffer, Evaluator, ListingQuery, Verdict, Yen};
use crate::port::{Marketplace, ProductCatalog};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordHit {
    #[serde(rename = "ASIN")]
    pub asin: Asin,
    #[serde(rename = "商品名")]
    pub title: String,
    #[serde(rename = "Amazon想定売価")]
    pub sell_price: Yen,
    #[serde(rename = "楽天仕入価格")]
    pub rakuten_price: Yen,
    #[serde(rename = "楽天送料")]
    pub rakuten_shipping: Yen,
    #[serde(rename = "粗利益")]
    pub profit: Yen,
    #[serde(rename = "利益率(ROI)")]
    pub roi: Option<Decimal>,
    #[serde(rename = "FBA手数料")]
    pub fulfillment_fee: Yen,
    #[serde(rename = "楽天URL")]
    pub rakuten_url: String,
    #[serde(rename = "KeepaURL")]
    pub keepa_url: String,
}

pub struct KeywordHuntPipeline<'a> {
    catalog: &'a dyn ProductCatalog,
    marketplace: &'a dyn Marketplace,
    evaluator: Evaluator,
    keepa_domain: u8,
}

impl<'a> KeywordHuntPipeline<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn ProductCatalog,
        marketplace: &'a dyn Marketplace,
        evaluator: Evaluator,
        keepa_domain: u8,
    ) -> Self {
        Self {
            catalog,
            marketplace,
            evaluator,
            keepa_domain,
        }
    }

    pub async fn run(&self, keywords: &[String], progress: &dyn Progress) -> Report<KeywordHit> {
        let mut report = Report::default();
        progress.start(keywords.len(), "hunt keywords");

        for keyword in keywords {
            report.stats.examine();
            self.hunt(keyword, &mut report).await;
            progress.advance(keyword);
        }

        progress.finish();
        report
    }

    async fn hunt(&self, keyword: &str, report: &mut Report<KeywordHit>) {
        let product = match self.catalog.search(keyword).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                info!(keyword, "Keepa: not found");
                report.stats.skip(NOT_ON_KEEPA);
                return;
            }
            Err(err) => {
                warn!(keyword, error = %err, "Keepa search failed");
                report.stats.fail();
                return;
            }
        };

        // Market gates first; Rakuten is only asked about items Amazon is out of.
        if let Verdict::Rejected { reason, .. } = self.evaluator.evaluate(&product, None) {
            info!(keyword, asin = %product.asin, reason = %reason, "NG");
            report.stats.reject(&reason);
            return;
        }
        info!(
            keyword,
            asin = %product.asin,
            sell_price = ?product.expected_sell_price,
            "Amazon likely out of stock"
        );

        let listing = match self.marketplace.cheapest(&ListingQuery::keyword(keyword)).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                info!(keyword, "Rakuten: stock not found");
                report.stats.skip(NOT_ON_RAKUTEN);
                return;
            }
            Err(err) => {
                warn!(keyword, error = %err, "Rakuten lookup failed");
                report.stats.fail();
                return;
            }
        };

        let offer = BuyOffer::new(listing.price).with_shipping(listing.shipping);
        match self.evaluator.evaluate(&product, Some(offer)) {
            Verdict::Accepted(appraisal) => {
                let profit = appraisal.profit_yen().unwrap_or_default();
                info!(keyword, asin = %product.asin, profit = %profit, "HIT");
                report.stats.accept();
                report.rows.push(KeywordHit {
                    keepa_url: product.asin.keepa_url(self.keepa_domain),
                    asin: product.asin,
                    title: product.title,
                    sell_price: appraisal.sell_price,
                    rakuten_price: listing.price,
                    rakuten_shipping: listing.shipping,
                    profit,
                    roi: appraisal.roi(),
                    fulfillment_fee: whole_yen(appraisal.fees.fulfillment),
                    rakuten_url: listing.url,
                });
            }
            Verdict::Rejected { reason, .. } => {
                info!(keyword, asin = %product.asin, reason = %reason, "Low profit");
                report.stats.reject(&reason);
            }
        }
    }
}
