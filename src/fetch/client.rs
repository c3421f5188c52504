// src/fetch/client.rs

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};

use super::urls::orders_url_for;
use super::{OrderSource, OrderSourceError};
use crate::orders::{OrdersResponse, RawOrder};
use crate::settings::ShopAuth;

/// Header carrying the shop's admin API token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Reads orders from the shop's admin REST API with one blocking request.
#[derive(Debug, Clone, Default)]
pub struct ShopifyClient {
    client: Client,
}

impl ShopifyClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderSource for ShopifyClient {
    #[instrument(level = "debug", skip(self, auth), fields(domain = %auth.domain))]
    fn fetch_orders(&self, auth: &ShopAuth) -> Result<Vec<RawOrder>, OrderSourceError> {
        let url = orders_url_for(auth).map_err(|e| OrderSourceError::Url(format!("{:#}", e)))?;
        debug!(%url, "requesting COD orders");

        let resp = self
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, auth.access_token.as_str())
            .header(ACCEPT, "application/json")
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(OrderSourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OrdersResponse = serde_json::from_str(&body)?;
        debug!(count = parsed.orders.len(), "orders received");
        Ok(parsed.orders)
    }
}
