// src/fetch/mod.rs

pub mod client;
pub mod pipeline;
pub mod urls;

use thiserror::Error;

use crate::orders::RawOrder;
use crate::settings::ShopAuth;

pub use client::ShopifyClient;
pub use pipeline::{
    fetch_cod_rows, load_cod_orders, refresh_sheet, FetchResult, FETCH_FAILED_MESSAGE,
    NO_ORDERS_MESSAGE,
};

/// Why a read from the order source failed.
#[derive(Debug, Error)]
pub enum OrderSourceError {
    #[error("invalid orders URL: {0}")]
    Url(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("order source returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed orders response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can list the shop's COD-tagged orders (one page, no cursor).
pub trait OrderSource {
    fn fetch_orders(&self, auth: &ShopAuth) -> Result<Vec<RawOrder>, OrderSourceError>;
}
