//! Destination-marketplace lookups (price and sales history).

use async_trait::async_trait;

use crate::domain::{Asin, ProductStats};
use crate::error::Result;

/// Source of [`ProductStats`] for Amazon listings.
///
/// `Ok(None)` means the service answered but knows no such product; errors
/// are transport or rejection failures the caller logs and skips.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Look up one product by ASIN.
    async fn product(&self, asin: &Asin) -> Result<Option<ProductStats>>;

    /// Find the best match for a free-text keyword.
    async fn search(&self, keyword: &str) -> Result<Option<ProductStats>>;

    /// Name of the service, for logs.
    fn name(&self) -> &'static str;
}
