//! Source-marketplace offers.

use super::id::Jan;
use super::money::Yen;

/// One purchasable offer on Rakuten Ichiba.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub price: Yen,
    /// Shipping charged on top of `price`; zero when postage is included.
    pub shipping: Yen,
    pub url: String,
    pub shop_name: Option<String>,
    /// Position in a genre ranking, when the listing came from one.
    pub rank: Option<u32>,
}

impl Listing {
    /// Price plus shipping.
    #[must_use]
    pub fn landed_price(&self) -> Yen {
        self.price + self.shipping
    }
}

/// How to look up an offer on the source marketplace.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingTerm {
    Keyword(String),
    Jan(Jan),
}

/// A cheapest-offer query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub term: ListingTerm,
    pub max_price: Option<Yen>,
}

impl ListingQuery {
    #[must_use]
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            term: ListingTerm::Keyword(keyword.into()),
            max_price: None,
        }
    }

    #[must_use]
    pub fn jan(jan: Jan) -> Self {
        Self {
            term: ListingTerm::Jan(jan),
            max_price: None,
        }
    }

    #[must_use]
    pub fn with_max_price(mut self, max_price: Yen) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// The string sent as the search keyword.
    #[must_use]
    pub fn keyword_text(&self) -> &str {
        match &self.term {
            ListingTerm::Keyword(k) => k,
            ListingTerm::Jan(jan) => jan.as_str(),
        }
    }
}

/// Turn a product title into a search keyword.
///
/// Keeps the first `max_chars` characters, replaces the lenticular brackets
/// shops wrap promotions in, and collapses whitespace. Long titles rarely
/// match anything on the other marketplace.
#[must_use]
pub fn search_keyword(title: &str, max_chars: usize) -> String {
    let truncated: String = title.chars().take(max_chars).collect();
    truncated
        .replace(['【', '】'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
