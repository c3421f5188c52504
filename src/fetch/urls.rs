// src/fetch/urls.rs

use anyhow::{Context, Result};
use url::Url;

use crate::orders::COD_TAG;
use crate::settings::ShopAuth;

/// Fields requested from the orders endpoint; everything the normalizer reads.
pub static ORDER_FIELDS: &[&str] = &[
    "name",
    "created_at",
    "email",
    "phone",
    "customer",
    "shipping_address",
    "line_items",
    "total_price",
    "currency",
    "total_shipping_price_set",
    "tags",
    "financial_status",
    "fulfillment_status",
];

/// `https://<domain>` unless the domain already carries a scheme.
pub fn shop_base_url(domain: &str) -> Result<Url> {
    let domain = domain.trim().trim_end_matches('/');
    let raw = if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    };
    Url::parse(&raw).with_context(|| format!("parsing shop domain {}", domain))
}

/// `<base>/admin/api/<version>/orders.json?status=any&tagged_with=COD&fields=...`
pub fn cod_orders_url(base: &Url, api_version: &str) -> Result<Url> {
    let mut url = base
        .join(&format!("/admin/api/{}/orders.json", api_version))
        .with_context(|| format!("building orders URL from {}", base))?;
    url.query_pairs_mut()
        .append_pair("status", "any")
        .append_pair("tagged_with", COD_TAG)
        .append_pair("fields", &ORDER_FIELDS.join(","));
    Ok(url)
}

/// Orders URL for a configured shop.
pub fn orders_url_for(auth: &ShopAuth) -> Result<Url> {
    cod_orders_url(&shop_base_url(&auth.domain)?, &auth.api_version)
}
