//! Rakuten Ichiba response shapes (format version 1).

use rust_decimal::Decimal;
use serde::Deserialize;

/// Postage is charged on top of the item price.
pub const POSTAGE_NOT_INCLUDED: u8 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsResponse {
    #[serde(rename = "Items", default)]
    pub items: Vec<ItemWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemWrapper {
    #[serde(rename = "Item")]
    pub item: ItemDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub item_name: Option<String>,
    pub item_price: Option<Decimal>,
    pub item_url: Option<String>,
    pub shop_name: Option<String>,
    pub postage_flag: Option<u8>,
    pub rank: Option<u32>,
}

/// Error body, e.g. `{"error":"wrong_parameter","error_description":"..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}
