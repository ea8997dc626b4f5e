//! Compact terminal rows for the top results of each pipeline.

use rust_decimal::Decimal;
use tabled::Tabled;

use crate::application::bulk_scan::ScanRow;
use crate::application::cross_check::CrossCheckRow;
use crate::application::export_hunt::HuntHit;
use crate::application::gap_search::GapHit;
use crate::application::genre_research::ResearchRow;
use crate::application::keyword_hunt::KeywordHit;
use crate::application::selection::SelectedRow;
use crate::domain::Yen;

/// Characters of the item name shown in the table.
const NAME_WIDTH: usize = 28;

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct TopRow {
    #[tabled(rename = "Item")]
    pub item: String,
    #[tabled(rename = "Buy")]
    pub buy: String,
    #[tabled(rename = "Sell")]
    pub sell: String,
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[tabled(rename = "ROI")]
    pub roi: String,
}

impl TopRow {
    fn new(item: &str, buy: Option<Yen>, sell: Option<Yen>, profit: Option<Yen>, roi: Option<Decimal>) -> Self {
        Self {
            item: truncate(item),
            buy: yen(buy),
            sell: yen(sell),
            profit: yen(profit),
            roi: roi.map_or_else(|| "-".into(), |r| format!("{:.0}%", r * Decimal::ONE_HUNDRED)),
        }
    }
}

fn truncate(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        return name.to_string();
    }
    let mut short: String = name.chars().take(NAME_WIDTH - 1).collect();
    short.push('…');
    short
}

fn yen(value: Option<Yen>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("¥{}", v.round()))
}

/// A report row that can be shown in the top-results table.
pub trait Summarize {
    fn top_row(&self) -> TopRow;
}

/// First `limit` rows of `rows` as table rows.
pub fn top_rows<T: Summarize>(rows: &[T], limit: usize) -> Vec<TopRow> {
    rows.iter().take(limit).map(Summarize::top_row).collect()
}

impl Summarize for SelectedRow {
    fn top_row(&self) -> TopRow {
        TopRow::new(&self.title, Some(self.buy_price), Some(self.sell_price), Some(self.profit), self.roi)
    }
}

impl Summarize for CrossCheckRow {
    fn top_row(&self) -> TopRow {
        TopRow::new(
            &self.title,
            Some(self.rakuten_price + self.rakuten_shipping),
            Some(self.amazon_price),
            Some(self.profit),
            self.roi,
        )
    }
}

impl Summarize for ScanRow {
    fn top_row(&self) -> TopRow {
        TopRow::new(&self.title, None, self.expected_sell_price, None, None)
    }
}

impl Summarize for ResearchRow {
    fn top_row(&self) -> TopRow {
        TopRow::new(&self.item_name, Some(self.buy_price), Some(self.sell_price), Some(self.profit), self.roi)
    }
}

impl Summarize for HuntHit {
    fn top_row(&self) -> TopRow {
        TopRow::new(
            &self.title,
            Some(self.rakuten_price + self.rakuten_shipping),
            Some(self.amazon_price),
            Some(self.profit),
            self.roi,
        )
    }
}

impl Summarize for KeywordHit {
    fn top_row(&self) -> TopRow {
        TopRow::new(
            &self.title,
            Some(self.rakuten_price + self.rakuten_shipping),
            Some(self.sell_price),
            Some(self.profit),
            self.roi,
        )
    }
}

impl Summarize for GapHit {
    fn top_row(&self) -> TopRow {
        TopRow::new(
            &self.item_name,
            Some(self.rakuten_price + self.rakuten_shipping - self.rakuten_points),
            Some(self.amazon_price),
            Some(self.profit),
            self.roi,
        )
    }
}
