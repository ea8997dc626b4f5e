//! Bulk scan: every bestseller export in a directory → Keepa → market gates.
//!
//! Exports carry no purchase price, so only the Amazon presence, rank and
//! sell price gates apply.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::report::{Progress, Report, NOT_ON_KEEPA};
use crate::adapter::csv::{csv_files, read_asins};
use crate::domain::{Asin, Evaluator, ProductStats, Verdict, Yen};
use crate::error::Result;
use crate::port::ProductCatalog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRow {
    pub asin: Asin,
    pub title: String,
    pub reason: &'static str,
    pub avg_rank_90d: Option<u64>,
    pub expected_sell_price: Option<Yen>,
    pub amazon_current: Option<Yen>,
    pub is_amazon_buybox: bool,
    pub category: Option<String>,
    pub keepa_link: String,
}

/// ASINs gathered from a directory of exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanInput {
    pub files: Vec<PathBuf>,
    pub asins: Vec<Asin>,
    /// The directory did not exist and was created empty.
    pub created_dir: bool,
}

/// Collect unique ASINs from every `*.csv` in `dir`, in file name order.
///
/// A missing directory is created so exports can be dropped into it.
pub fn collect_asins(dir: &Path) -> Result<ScanInput> {
    let mut input = ScanInput::default();
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
        warn!(dir = %dir.display(), "Input directory not found, created it empty");
        input.created_dir = true;
        return Ok(input);
    }

    let files = csv_files(dir)?;

    for file in &files {
        match read_asins(file) {
            Ok(asins) => {
                info!(file = %file.display(), count = asins.len(), "Loaded ASINs");
                for asin in asins {
                    if !input.asins.contains(&asin) {
                        input.asins.push(asin);
                    }
                }
            }
            Err(err) => warn!(file = %file.display(), error = %err, "Skipping unreadable export"),
        }
    }

    input.files = files;
    Ok(input)
}

pub struct BulkScanPipeline<'a> {
    catalog: &'a dyn ProductCatalog,
    evaluator: Evaluator,
    keepa_domain: u8,
}

impl<'a> BulkScanPipeline<'a> {
    #[must_use]
    pub fn new(catalog: &'a dyn ProductCatalog, evaluator: Evaluator, keepa_domain: u8) -> Self {
        Self {
            catalog,
            evaluator,
            keepa_domain,
        }
    }

    pub async fn run(&self, asins: &[Asin], progress: &dyn Progress) -> Report<ScanRow> {
        let mut report = Report::default();
        progress.start(asins.len(), "scan");

        for (i, asin) in asins.iter().enumerate() {
            report.stats.examine();

            match self.catalog.product(asin).await {
                Ok(Some(product)) => match self.evaluator.evaluate(&product, None) {
                    Verdict::Accepted(_) => {
                        info!(asin = %asin, index = i + 1, total = asins.len(), "OK");
                        report.stats.accept();
                        report.rows.push(self.row(product));
                    }
                    Verdict::Rejected { reason, .. } => {
                        info!(asin = %asin, reason = %reason, "NG");
                        report.stats.reject(&reason);
                    }
                },
                Ok(None) => {
                    info!(asin = %asin, "Skip (no data)");
                    report.stats.skip(NOT_ON_KEEPA);
                }
                Err(err) => {
                    warn!(asin = %asin, error = %err, "Skip (lookup failed)");
                    report.stats.fail();
                }
            }
            progress.advance(asin.as_str());
        }

        progress.finish();
        report
    }

    fn row(&self, product: ProductStats) -> ScanRow {
        ScanRow {
            keepa_link: product.asin.keepa_url(self.keepa_domain),
            asin: product.asin,
            title: product.title,
            reason: "OK",
            avg_rank_90d: product.avg_rank_90d,
            expected_sell_price: product.expected_sell_price,
            amazon_current: product.amazon_current,
            is_amazon_buybox: product.buybox_is_amazon,
            category: product.category,
        }
    }
}
