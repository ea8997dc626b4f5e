//! Gap search: JAN rows with a known Amazon cart price → Rakuten by JAN →
//! point-aware profit.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::report::{Progress, Report, NOT_ON_RAKUTEN};
use crate::domain::profit::points_for;
use crate::domain::{Asin, BuyOffer, Evaluator, GapRow, Jan, ListingQuery, Parcel, Verdict, Yen};
use crate::port::Marketplace;

/// Characters of the row keyword kept as the item name.
const NAME_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapHit {
    pub asin: Option<Asin>,
    pub jan: Jan,
    pub item_name: String,
    pub amazon_price: Yen,
    pub rakuten_price: Yen,
    pub rakuten_shipping: Yen,
    pub rakuten_points: Yen,
    pub profit: Yen,
    pub roi: Option<Decimal>,
    pub rakuten_url: String,
    pub amazon_url: Option<String>,
}

pub struct GapSearchPipeline<'a> {
    marketplace: &'a dyn Marketplace,
    evaluator: Evaluator,
    point_rate: Decimal,
}

impl<'a> GapSearchPipeline<'a> {
    /// `point_rate` is the share of the Rakuten price returned as points.
    #[must_use]
    pub fn new(marketplace: &'a dyn Marketplace, evaluator: Evaluator, point_rate: Decimal) -> Self {
        Self {
            marketplace,
            evaluator,
            point_rate,
        }
    }

    pub async fn run(&self, rows: &[GapRow], progress: &dyn Progress) -> Report<GapHit> {
        let mut report = Report::default();
        if !self.marketplace.is_enabled() {
            warn!("Rakuten is disabled, no JAN can be priced");
        }
        progress.start(rows.len(), "gap search");

        for row in rows {
            report.stats.examine();
            self.search(row, &mut report).await;
            progress.advance(row.jan.as_str());
        }

        progress.finish();
        report
    }

    async fn search(&self, row: &GapRow, report: &mut Report<GapHit>) {
        let listing = match self.marketplace.cheapest(&ListingQuery::jan(row.jan.clone())).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                info!(jan = %row.jan, "Rakuten: not found");
                report.stats.skip(NOT_ON_RAKUTEN);
                return;
            }
            Err(err) => {
                warn!(jan = %row.jan, error = %err, "Rakuten lookup failed");
                report.stats.fail();
                return;
            }
        };

        let points = points_for(listing.price, self.point_rate);
        let offer = BuyOffer::new(listing.price)
            .with_shipping(listing.shipping)
            .with_points(points);

        match self.evaluator.appraise(row.target_price, &Parcel::default(), offer) {
            Verdict::Accepted(appraisal) => {
                let profit = appraisal.profit_yen().unwrap_or_default();
                info!(jan = %row.jan, profit = %profit, points = %points, "HIT");
                report.stats.accept();
                report.rows.push(GapHit {
                    asin: row.asin.clone(),
                    jan: row.jan.clone(),
                    item_name: row.keyword.chars().take(NAME_CHARS).collect(),
                    amazon_price: row.target_price,
                    rakuten_price: listing.price,
                    rakuten_shipping: listing.shipping,
                    rakuten_points: points,
                    profit,
                    roi: appraisal.roi(),
                    rakuten_url: listing.url,
                    amazon_url: row
                        .url
                        .clone()
                        .or_else(|| row.asin.as_ref().map(Asin::amazon_url)),
                });
            }
            Verdict::Rejected { reason, .. } => {
                info!(jan = %row.jan, reason = %reason, "Low profit");
                report.stats.reject(&reason);
            }
        }
    }
}
