//! Destination-marketplace product snapshot.

use rust_decimal::Decimal;

use super::id::{Asin, Jan};
use super::money::Yen;

/// Package dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

impl Dimensions {
    /// Create dimensions from three sides in centimetres.
    #[must_use]
    pub const fn new(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Sum of the three sides, the figure Amazon's size tiers are keyed on.
    #[must_use]
    pub fn sum(&self) -> Decimal {
        self.length + self.width + self.height
    }

    /// Volume in cubic centimetres.
    #[must_use]
    pub fn volume_cm3(&self) -> Decimal {
        self.length * self.width * self.height
    }
}

/// What Keepa knows about one Amazon listing, reduced to the fields the
/// selection rules look at.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub asin: Asin,
    pub title: String,
    /// Average sales rank over the stats window (90 days by default).
    pub avg_rank_90d: Option<u64>,
    /// Price we expect to sell at: the buy box, falling back to new offers.
    pub expected_sell_price: Option<Yen>,
    /// Amazon itself currently holds the buy box.
    pub buybox_is_amazon: bool,
    /// Amazon's own current offer; `None` when Amazon is out of stock.
    pub amazon_current: Option<Yen>,
    /// Share of the stats window Amazon was in stock (0..=1).
    pub amazon_presence_ratio: Option<Decimal>,
    /// Share of the stats window Amazon held the buy box (0..=1).
    pub amazon_buybox_share: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub dimensions_cm: Option<Dimensions>,
    pub category: Option<String>,
    pub jan: Option<Jan>,
}

impl ProductStats {
    /// A product with only identity fields set.
    #[must_use]
    pub fn new(asin: Asin, title: impl Into<String>) -> Self {
        Self {
            asin,
            title: title.into(),
            avg_rank_90d: None,
            expected_sell_price: None,
            buybox_is_amazon: false,
            amazon_current: None,
            amazon_presence_ratio: None,
            amazon_buybox_share: None,
            weight_kg: None,
            dimensions_cm: None,
            category: None,
            jan: None,
        }
    }

    /// Parcel description used by the fee schedules.
    #[must_use]
    pub fn parcel(&self) -> super::fee::Parcel {
        super::fee::Parcel {
            weight_kg: self.weight_kg,
            dimensions_cm: self.dimensions_cm,
            volume_cm3: self.dimensions_cm.map(|d| d.volume_cm3()),
            category: self.category.clone(),
        }
    }
}
