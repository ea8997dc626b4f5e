//! Cross-check: candidate ASINs → Keepa → cheapest Rakuten offer by title.
//!
//! Every item found on Rakuten is kept; profit and ROI are informational.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::report::{Progress, Report, NOT_ON_KEEPA, NOT_ON_RAKUTEN};
use crate::domain::listing::search_keyword;
use crate::domain::money::{ratio, whole_yen};
use crate::domain::{Asin, FeeSchedule, Listing, ListingQuery, ProductStats, ProfitInput, Yen};
use crate::port::{Marketplace, ProductCatalog};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossCheckRow {
    pub asin: Asin,
    pub title: String,
    /// Zero when Keepa knows no price at all.
    pub amazon_price: Yen,
    pub rakuten_price: Yen,
    pub rakuten_shipping: Yen,
    pub profit: Yen,
    pub roi: Option<Decimal>,
    pub shop_name: String,
    pub rank_90d: Option<u64>,
    pub amazon_url: String,
    pub rakuten_url: String,
}

pub struct CrossCheckPipeline<'a> {
    catalog: &'a dyn ProductCatalog,
    marketplace: &'a dyn Marketplace,
    fees: FeeSchedule,
    keyword_max_chars: usize,
}

impl<'a> CrossCheckPipeline<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn ProductCatalog,
        marketplace: &'a dyn Marketplace,
        fees: FeeSchedule,
        keyword_max_chars: usize,
    ) -> Self {
        Self {
            catalog,
            marketplace,
            fees,
            keyword_max_chars,
        }
    }

    pub async fn run(&self, asins: &[Asin], progress: &dyn Progress) -> Report<CrossCheckRow> {
        let mut report = Report::default();
        if !self.marketplace.is_enabled() {
            warn!("Rakuten is disabled, no item can be cross-checked");
        }
        progress.start(asins.len(), "cross-check");

        for asin in asins {
            report.stats.examine();

            match self.catalog.product(asin).await {
                Ok(Some(product)) => self.check(&product, &mut report).await,
                Ok(None) => {
                    info!(asin = %asin, "Keepa no data, skip");
                    report.stats.skip(NOT_ON_KEEPA);
                }
                Err(err) => {
                    warn!(asin = %asin, error = %err, "Keepa lookup failed, skip");
                    report.stats.fail();
                }
            }
            progress.advance(asin.as_str());
        }

        progress.finish();
        report
    }

    async fn check(&self, product: &ProductStats, report: &mut Report<CrossCheckRow>) {
        let keyword = search_keyword(&product.title, self.keyword_max_chars);
        let listing = match self.marketplace.cheapest(&ListingQuery::keyword(keyword)).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                info!(asin = %product.asin, "Rakuten not found");
                report.stats.skip(NOT_ON_RAKUTEN);
                return;
            }
            Err(err) => {
                warn!(asin = %product.asin, error = %err, "Rakuten lookup failed");
                report.stats.fail();
                return;
            }
        };

        let row = self.row(product, &listing);
        info!(
            asin = %product.asin,
            rakuten_price = %listing.price,
            profit = %row.profit,
            "Rakuten found"
        );
        report.stats.accept();
        report.rows.push(row);
    }

    fn row(&self, product: &ProductStats, listing: &Listing) -> CrossCheckRow {
        let amazon_price = product
            .expected_sell_price
            .or(product.amazon_current)
            .unwrap_or(Decimal::ZERO);

        let (profit, roi) = if amazon_price > Decimal::ZERO {
            let fees = self.fees.estimate(amazon_price, &product.parcel());
            let result = ProfitInput::new(amazon_price, listing.price, fees)
                .with_shipping(listing.shipping)
                .compute();
            (whole_yen(result.profit), result.roi.map(ratio))
        } else {
            (Decimal::ZERO, None)
        };

        CrossCheckRow {
            asin: product.asin.clone(),
            title: product.title.clone(),
            amazon_price,
            rakuten_price: listing.price,
            rakuten_shipping: listing.shipping,
            profit,
            roi,
            shop_name: listing.shop_name.clone().unwrap_or_default(),
            rank_90d: product.avg_rank_90d,
            amazon_url: product.asin.amazon_url(),
            rakuten_url: listing.url.clone(),
        }
    }
}
