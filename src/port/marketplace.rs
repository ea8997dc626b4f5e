//! Source-marketplace lookups (where we buy).

use async_trait::async_trait;

use crate::domain::{Listing, ListingQuery};
use crate::error::Result;

/// Marketplace we purchase from.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Cheapest available offer matching the query.
    async fn cheapest(&self, query: &ListingQuery) -> Result<Option<Listing>>;

    /// Bestseller ranking for a genre, best first.
    async fn ranking(&self, genre_id: &str) -> Result<Vec<Listing>>;

    /// False when credentials are missing and every lookup is skipped.
    fn is_enabled(&self) -> bool;

    /// Name of the service, for logs.
    fn name(&self) -> &'static str;
}
