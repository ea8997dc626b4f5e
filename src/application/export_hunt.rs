//! Export hunt: Keepa product finder export → Rakuten by JAN → profit.
//!
//! Export rows carry only package grams and cm³, so fees come from a
//! weight-class schedule and no market gates apply.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::report::{Progress, Report, NOT_ON_RAKUTEN};
use crate::adapter::csv::{csv_files, read_export};
use crate::domain::money::whole_yen;
use crate::domain::{Asin, BuyOffer, Evaluator, ExportRow, Jan, ListingQuery, Verdict, Yen};
use crate::error::{InputError, Result};
use crate::port::Marketplace;

/// Characters of the product title kept in the report.
const TITLE_CHARS: usize = 30;

const MISSING_JAN: &str = "missing_jan";
const MISSING_PRICE: &str = "missing_amazon_price";

/// Column names match the ordering sheet the hunt feeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HuntHit {
    #[serde(rename = "判定")]
    pub verdict: &'static str,
    #[serde(rename = "商品名")]
    pub title: String,
    #[serde(rename = "ASIN")]
    pub asin: Option<Asin>,
    #[serde(rename = "JAN")]
    pub jan: Jan,
    #[serde(rename = "Amazon価格")]
    pub amazon_price: Yen,
    #[serde(rename = "楽天仕入")]
    pub rakuten_price: Yen,
    #[serde(rename = "楽天送料")]
    pub rakuten_shipping: Yen,
    #[serde(rename = "粗利益")]
    pub profit: Yen,
    #[serde(rename = "利益率(ROI)")]
    pub roi: Option<Decimal>,
    #[serde(rename = "FBA手数料(概算)")]
    pub fulfillment_fee: Yen,
    #[serde(rename = "楽天URL")]
    pub rakuten_url: String,
    #[serde(rename = "AmazonURL")]
    pub amazon_url: Option<String>,
}

/// "Profitable" marker in the verdict column.
pub const PROFITABLE: &str = "利益あり";

/// Read one export file, or every `*.csv` export in a directory.
pub fn collect_export_rows(input: &Path) -> Result<Vec<ExportRow>> {
    if input.is_file() {
        return read_export(input);
    }
    if !input.is_dir() {
        return Err(InputError::NotFound(input.display().to_string()).into());
    }

    let mut rows = Vec::new();
    for file in csv_files(input)? {
        match read_export(&file) {
            Ok(mut batch) => {
                info!(file = %file.display(), rows = batch.len(), "Loaded export");
                rows.append(&mut batch);
            }
            Err(err) => warn!(file = %file.display(), error = %err, "Error reading export"),
        }
    }
    Ok(rows)
}

pub struct ExportHuntPipeline<'a> {
    marketplace: &'a dyn Marketplace,
    evaluator: Evaluator,
}

impl<'a> ExportHuntPipeline<'a> {
    #[must_use]
    pub fn new(marketplace: &'a dyn Marketplace, evaluator: Evaluator) -> Self {
        Self {
            marketplace,
            evaluator,
        }
    }

    pub async fn run(&self, rows: &[ExportRow], progress: &dyn Progress) -> Report<HuntHit> {
        let mut report = Report::default();
        if !self.marketplace.is_enabled() {
            warn!("Rakuten is disabled, no export row can be priced");
        }
        progress.start(rows.len(), "hunt export");

        for row in rows {
            report.stats.examine();
            self.hunt(row, &mut report).await;
            progress.advance(&row.title);
        }

        progress.finish();
        report
    }

    async fn hunt(&self, row: &ExportRow, report: &mut Report<HuntHit>) {
        let Some(jan) = row.jan.clone() else {
            report.stats.skip(MISSING_JAN);
            return;
        };
        let Some(amazon_price) = row.sell_price() else {
            debug!(jan = %jan, "No Amazon price in export");
            report.stats.skip(MISSING_PRICE);
            return;
        };

        let listing = match self.marketplace.cheapest(&ListingQuery::jan(jan.clone())).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                info!(jan = %jan, amazon_price = %amazon_price, "Rakuten: Not Found");
                report.stats.skip(NOT_ON_RAKUTEN);
                return;
            }
            Err(err) => {
                warn!(jan = %jan, error = %err, "Rakuten lookup failed");
                report.stats.fail();
                return;
            }
        };

        let offer = BuyOffer::new(listing.price).with_shipping(listing.shipping);
        match self.evaluator.appraise(amazon_price, &row.parcel(), offer) {
            Verdict::Accepted(appraisal) => {
                let profit = appraisal.profit_yen().unwrap_or_default();
                info!(jan = %jan, profit = %profit, roi = ?appraisal.roi(), "HIT");
                report.stats.accept();
                report.rows.push(HuntHit {
                    verdict: PROFITABLE,
                    title: row.title.chars().take(TITLE_CHARS).collect(),
                    asin: row.asin.clone(),
                    jan,
                    amazon_price,
                    rakuten_price: listing.price,
                    rakuten_shipping: listing.shipping,
                    profit,
                    roi: appraisal.roi(),
                    fulfillment_fee: whole_yen(appraisal.fees.fulfillment),
                    rakuten_url: listing.url,
                    amazon_url: row.asin.as_ref().map(Asin::amazon_url),
                });
            }
            Verdict::Rejected { reason, .. } => {
                info!(jan = %jan, reason = %reason, "Low profit");
                report.stats.reject(&reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_not_found() {
        let err = collect_export_rows(Path::new("/nonexistent/raw_keepa")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Input(InputError::NotFound(_))
        ));
    }

    #[test]
    fn directory_exports_are_concatenated() {
        let dir = tempfile::tempdir().unwrap();
        let header = "商品名,ASIN,商品コード: EAN,Amazon: 現在価格\n";
        std::fs::write(
            dir.path().join("a.csv"),
            format!("{header}a,B00TEST001,4988601012345,1000\n"),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.csv"),
            format!("{header}b,B00TEST002,4988601012346,2000\n"),
        )
        .unwrap();

        let rows = collect_export_rows(dir.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title, "b");
    }
}
