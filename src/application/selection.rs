//! Candidate selection: priced ASIN list → Keepa → buy/skip decision.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::report::{Progress, Report, NOT_ON_KEEPA};
use crate::domain::money::whole_yen;
use crate::domain::{Appraisal, Asin, BuyOffer, Candidate, Evaluator, Verdict, Yen};
use crate::port::ProductCatalog;

/// One accepted candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRow {
    pub asin: Asin,
    pub title: String,
    pub buy_price: Yen,
    pub sell_price: Yen,
    pub referral_fee: Yen,
    pub fulfillment_fee: Yen,
    pub profit: Yen,
    pub roi: Option<Decimal>,
    pub avg_rank_90d: Option<u64>,
    pub amazon_url: String,
    pub notes: String,
}

impl SelectedRow {
    fn new(candidate: &Candidate, title: &str, appraisal: &Appraisal) -> Self {
        Self {
            asin: candidate.asin.clone(),
            title: title.to_string(),
            buy_price: appraisal.offer.map_or(Decimal::ZERO, |o| o.price),
            sell_price: appraisal.sell_price,
            referral_fee: whole_yen(appraisal.fees.referral),
            fulfillment_fee: whole_yen(appraisal.fees.fulfillment + appraisal.fees.storage),
            profit: appraisal.profit_yen().unwrap_or_default(),
            roi: appraisal.roi(),
            avg_rank_90d: appraisal.avg_rank_90d,
            amazon_url: candidate.asin.amazon_url(),
            notes: candidate.note.clone(),
        }
    }
}

/// Evaluates a hand-priced candidate list.
pub struct SelectionPipeline<'a> {
    catalog: &'a dyn ProductCatalog,
    evaluator: Evaluator,
}

impl<'a> SelectionPipeline<'a> {
    #[must_use]
    pub fn new(catalog: &'a dyn ProductCatalog, evaluator: Evaluator) -> Self {
        Self { catalog, evaluator }
    }

    pub async fn run(&self, candidates: &[Candidate], progress: &dyn Progress) -> Report<SelectedRow> {
        let mut report = Report::default();
        progress.start(candidates.len(), "select");

        for candidate in candidates {
            report.stats.examine();
            let asin = &candidate.asin;

            let product = match self.catalog.product(asin).await {
                Ok(Some(product)) => product,
                Ok(None) => {
                    info!(asin = %asin, "Skip: no Keepa data");
                    report.stats.skip(NOT_ON_KEEPA);
                    progress.advance(asin.as_str());
                    continue;
                }
                Err(err) => {
                    warn!(asin = %asin, error = %err, "Skip: Keepa lookup failed");
                    report.stats.fail();
                    progress.advance(asin.as_str());
                    continue;
                }
            };

            debug!(
                asin = %asin,
                avg_rank_90d = ?product.avg_rank_90d,
                sell_price = ?product.expected_sell_price,
                amazon_current = ?product.amazon_current,
                amazon_buybox_share = ?product.amazon_buybox_share,
                "Keepa stats"
            );

            let offer = candidate.buy_price.map(BuyOffer::new);
            match self.evaluator.evaluate(&product, offer) {
                Verdict::Accepted(appraisal) => {
                    info!(
                        asin = %asin,
                        profit = ?appraisal.profit_yen(),
                        roi = ?appraisal.roi(),
                        "Decision: OK"
                    );
                    report.stats.accept();
                    report
                        .rows
                        .push(SelectedRow::new(candidate, &product.title, &appraisal));
                }
                Verdict::Rejected { reason, .. } => {
                    info!(asin = %asin, reason = %reason, "Decision: NG");
                    report.stats.reject(&reason);
                }
            }
            progress.advance(asin.as_str());
        }

        progress.finish();
        report
    }
}
