//! Keepa REST response shapes, limited to the fields we read.

use std::collections::HashMap;

use serde::Deserialize;

/// Index of Amazon's own offer in the stats arrays.
pub const AMAZON: usize = 0;
/// Index of the lowest new offer.
pub const NEW: usize = 1;
/// Index of the sales rank.
pub const SALES: usize = 3;
/// Index of the buy box price including shipping.
pub const BUY_BOX_SHIPPING: usize = 18;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(default)]
    pub products: Vec<ProductDto>,
    pub tokens_left: Option<i64>,
    pub error: Option<ErrorDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDto {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub asin: String,
    pub title: Option<String>,
    pub stats: Option<StatsDto>,
    /// Grams.
    pub package_weight: Option<i64>,
    /// Millimetres.
    pub package_length: Option<i64>,
    pub package_width: Option<i64>,
    pub package_height: Option<i64>,
    pub ean_list: Option<Vec<String>>,
    pub category_tree: Option<Vec<CategoryDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDto {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    #[serde(default)]
    pub current: Vec<Option<i64>>,
    #[serde(default)]
    pub avg: Vec<Option<i64>>,
    #[serde(default)]
    pub avg90: Vec<Option<i64>>,
    pub buy_box_price: Option<i64>,
    pub buy_box_is_amazon: Option<bool>,
    #[serde(default)]
    pub out_of_stock_percentage90: Vec<Option<i64>>,
    pub buy_box_stats: Option<HashMap<String, BuyBoxSellerDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBoxSellerDto {
    pub percentage_won: Option<f64>,
}

impl StatsDto {
    /// Positive value at `index` of `series`; Keepa uses -1 for "no data".
    #[must_use]
    pub fn at(series: &[Option<i64>], index: usize) -> Option<i64> {
        series.get(index).copied().flatten().filter(|v| *v > 0)
    }

    /// The 90-day average series, falling back to the generic one.
    #[must_use]
    pub fn average(&self) -> &[Option<i64>] {
        if self.avg90.is_empty() {
            &self.avg
        } else {
            &self.avg90
        }
    }
}
