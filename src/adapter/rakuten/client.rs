//! Rakuten Ichiba item search and ranking client.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::dto::{ErrorResponse, ItemDto, ItemsResponse, POSTAGE_NOT_INCLUDED};
use super::settings::RakutenConfig;
use crate::adapter::http::HttpTransport;
use crate::domain::{Listing, ListingQuery};
use crate::error::{ApiError, Result};
use crate::port::Marketplace;

const SERVICE: &str = "rakuten";

/// [`Marketplace`] backed by the Rakuten Ichiba REST API.
///
/// Without an application id the client is disabled: lookups return
/// nothing instead of failing, so pipelines still run Keepa-only.
pub struct RakutenClient {
    transport: HttpTransport,
    config: RakutenConfig,
    application_id: Option<String>,
}

impl RakutenClient {
    #[must_use]
    pub fn new(config: RakutenConfig) -> Self {
        let application_id = config
            .application_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);

        if application_id.is_none() {
            warn!("RAKUTEN_APPLICATION_ID is not set, Rakuten lookups will be skipped");
        }

        let transport = HttpTransport::new(
            SERVICE,
            &config.http,
            Duration::from_millis(config.request_interval_ms),
        );

        Self {
            transport,
            config,
            application_id,
        }
    }

    async fn items(&self, url: &str, query: Vec<(&str, String)>) -> Result<Vec<ItemDto>> {
        let raw = self.transport.get(url, &query).await.map_err(|err| {
            warn!(error = %err, "Rakuten API HTTP error");
            err
        })?;

        if !raw.status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&raw.body)
                .map(|e| format!("{}: {}", e.error, e.error_description))
                .unwrap_or_else(|_| raw.body.chars().take(200).collect());
            warn!(status = raw.status.as_u16(), message = %message, "Rakuten API rejected request");
            return Err(ApiError::Rejected {
                service: SERVICE,
                status: raw.status.as_u16(),
                message,
            }
            .into());
        }

        let response: ItemsResponse = serde_json::from_str(&raw.body).map_err(|e| {
            warn!(error = %e, "Rakuten API JSON decode error");
            ApiError::Decode {
                service: SERVICE,
                reason: e.to_string(),
            }
        })?;

        Ok(response.items.into_iter().map(|w| w.item).collect())
    }

    fn to_listing(&self, item: ItemDto) -> Option<Listing> {
        map_item(item, self.config.assumed_shipping)
    }
}

#[async_trait]
impl Marketplace for RakutenClient {
    async fn cheapest(&self, query: &ListingQuery) -> Result<Option<Listing>> {
        let Some(app_id) = self.application_id.clone() else {
            return Ok(None);
        };
        let keyword = query.keyword_text().trim();
        if keyword.is_empty() {
            return Ok(None);
        }

        let mut params = vec![
            ("applicationId", app_id),
            ("keyword", keyword.to_string()),
            ("hits", self.config.hits.to_string()),
            ("sort", "+itemPrice".to_string()),
            ("format", "json".to_string()),
            ("availability", "1".to_string()),
        ];
        if let Some(max) = query.max_price {
            params.push(("maxPrice", max.trunc().to_string()));
        }

        let items = self.items(&self.config.search_url, params).await?;
        let listing = items.into_iter().find_map(|item| self.to_listing(item));
        debug!(keyword, found = listing.is_some(), "Rakuten search");
        Ok(listing)
    }

    async fn ranking(&self, genre_id: &str) -> Result<Vec<Listing>> {
        let Some(app_id) = self.application_id.clone() else {
            return Ok(Vec::new());
        };
        let params = vec![
            ("applicationId", app_id),
            ("genreId", genre_id.to_string()),
            ("format", "json".to_string()),
        ];

        let items = self.items(&self.config.ranking_url, params).await?;
        let listings: Vec<Listing> = items
            .into_iter()
            .filter_map(|item| self.to_listing(item))
            .collect();
        debug!(genre_id, count = listings.len(), "Rakuten ranking");
        Ok(listings)
    }

    fn is_enabled(&self) -> bool {
        self.application_id.is_some()
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

/// Convert an API item to a listing; items without price or URL are unusable.
#[must_use]
pub fn map_item(item: ItemDto, assumed_shipping: Decimal) -> Option<Listing> {
    let price = item.item_price?;
    let url = item.item_url?;
    let shipping = if item.postage_flag == Some(POSTAGE_NOT_INCLUDED) {
        assumed_shipping
    } else {
        Decimal::ZERO
    };

    Some(Listing {
        name: item.item_name.unwrap_or_default(),
        price,
        shipping,
        url,
        shop_name: item.shop_name,
        rank: item.rank,
    })
}
