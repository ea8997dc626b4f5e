//! Research inputs: hand-made candidate lists, Keepa exports, genres.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::fee::Parcel;
use super::id::{Asin, Jan};
use super::money::Yen;

/// A product someone already priced on the source side.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub asin: Asin,
    /// Known purchase price; `None` for plain ASIN lists.
    pub buy_price: Option<Yen>,
    pub note: String,
}

impl Candidate {
    #[must_use]
    pub fn new(asin: Asin, buy_price: Option<Yen>) -> Self {
        Self {
            asin,
            buy_price,
            note: String::new(),
        }
    }
}

/// One row of a Keepa product finder export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRow {
    pub asin: Option<Asin>,
    pub title: String,
    pub jan: Option<Jan>,
    pub buybox_price: Option<Yen>,
    pub amazon_price: Option<Yen>,
    pub new_price: Option<Yen>,
    pub package_weight_g: Option<Decimal>,
    pub package_volume_cm3: Option<Decimal>,
}

impl ExportRow {
    /// Price we expect to sell at: buy box, then Amazon, then lowest new.
    #[must_use]
    pub fn sell_price(&self) -> Option<Yen> {
        self.buybox_price
            .or(self.amazon_price)
            .or(self.new_price)
    }

    /// Parcel built from the export's grams and cm³ columns.
    #[must_use]
    pub fn parcel(&self) -> Parcel {
        Parcel {
            weight_kg: self.package_weight_g.map(|g| g / Decimal::ONE_THOUSAND),
            dimensions_cm: None,
            volume_cm3: self.package_volume_cm3,
            category: None,
        }
    }
}

/// A JAN-keyed row carrying the current Amazon cart price.
#[derive(Debug, Clone, PartialEq)]
pub struct GapRow {
    pub jan: Jan,
    pub asin: Option<Asin>,
    pub keyword: String,
    pub target_price: Yen,
    pub url: Option<String>,
}

/// A Rakuten Ichiba genre to scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

impl Genre {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// High-turnover genres worth scanning by default.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("100939", "美容・コスメ"),
            Self::new("562637", "家電"),
            Self::new("215783", "日用品・雑貨"),
            Self::new("101213", "ペット用品"),
        ]
    }
}
