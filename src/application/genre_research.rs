//! Genre research: Rakuten genre rankings → Keepa keyword search → order list.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::report::{Progress, Report, NOT_ON_KEEPA};
use crate::domain::listing::search_keyword;
use crate::domain::money::whole_yen;
use crate::domain::{Asin, BuyOffer, Evaluator, Genre, Listing, Verdict, Yen};
use crate::port::{Marketplace, ProductCatalog};

/// Order status written for new rows, "not ordered yet".
pub const STATUS_NOT_ORDERED: &str = "未発注";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchRow {
    pub status: &'static str,
    pub genre: String,
    pub item_name: String,
    pub profit: Yen,
    pub roi: Option<Decimal>,
    pub buy_price: Yen,
    pub sell_price: Yen,
    pub fees: Yen,
    pub rank: Option<u64>,
    pub rakuten_url: String,
    pub amazon_url: String,
    pub asin: Asin,
}

pub struct GenreResearchPipeline<'a> {
    catalog: &'a dyn ProductCatalog,
    marketplace: &'a dyn Marketplace,
    evaluator: Evaluator,
    keyword_max_chars: usize,
}

impl<'a> GenreResearchPipeline<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn ProductCatalog,
        marketplace: &'a dyn Marketplace,
        evaluator: Evaluator,
        keyword_max_chars: usize,
    ) -> Self {
        Self {
            catalog,
            marketplace,
            evaluator,
            keyword_max_chars,
        }
    }

    /// Walk `genres` in order; rows come back sorted by profit, highest first.
    pub async fn run(&self, genres: &[Genre], progress: &dyn Progress) -> Report<ResearchRow> {
        let mut report = Report::default();
        if !self.marketplace.is_enabled() {
            warn!("Rakuten is disabled, genre rankings will be empty");
        }

        for genre in genres {
            info!(genre = %genre.name, id = %genre.id, "Scanning genre");
            let listings = match self.marketplace.ranking(&genre.id).await {
                Ok(listings) => listings,
                Err(err) => {
                    warn!(genre = %genre.name, error = %err, "Failed to fetch genre ranking");
                    continue;
                }
            };
            info!(genre = %genre.name, count = listings.len(), "Fetched ranking");

            progress.start(listings.len(), &genre.name);
            for listing in &listings {
                report.stats.examine();
                self.research(genre, listing, &mut report).await;
                progress.advance(&listing.name);
            }
            progress.finish();
        }

        report.rows.sort_by(|a, b| b.profit.cmp(&a.profit));
        report
    }

    async fn research(&self, genre: &Genre, listing: &Listing, report: &mut Report<ResearchRow>) {
        let keyword = search_keyword(&listing.name, self.keyword_max_chars);
        let product = match self.catalog.search(&keyword).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                info!(keyword = %keyword, "Amazon not found");
                report.stats.skip(NOT_ON_KEEPA);
                return;
            }
            Err(err) => {
                warn!(keyword = %keyword, error = %err, "Keepa search failed");
                report.stats.fail();
                return;
            }
        };

        let offer = BuyOffer::new(listing.price).with_shipping(listing.shipping);
        match self.evaluator.evaluate(&product, Some(offer)) {
            Verdict::Accepted(appraisal) => {
                let row = ResearchRow {
                    status: STATUS_NOT_ORDERED,
                    genre: genre.name.clone(),
                    item_name: product.title.clone(),
                    profit: appraisal.profit_yen().unwrap_or_default(),
                    roi: appraisal.roi(),
                    buy_price: listing.price,
                    sell_price: appraisal.sell_price,
                    fees: whole_yen(appraisal.fees.total()),
                    rank: appraisal.avg_rank_90d,
                    rakuten_url: listing.url.clone(),
                    amazon_url: product.asin.amazon_url(),
                    asin: product.asin.clone(),
                };
                info!(asin = %product.asin, profit = %row.profit, "OK");
                report.stats.accept();
                report.rows.push(row);
            }
            Verdict::Rejected { reason, .. } => {
                info!(asin = %product.asin, reason = %reason, "NG");
                report.stats.reject(&reason);
            }
        }
    }
}
