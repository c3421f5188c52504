// src/orders/types.rs

use serde::{Deserialize, Deserializer};

/// An order as returned by the store's orders endpoint.
///
/// Every field is optional and JSON `null` is treated like a missing key. Use the
/// accessor methods rather than walking the nested options by hand: each one
/// names a single path through the record and returns `""`/`None` when any hop
/// on that path is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOrder {
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer: Option<Customer>,
    pub shipping_address: Option<Address>,
    #[serde(deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(deserialize_with = "amount")]
    pub total_price: Option<String>,
    pub currency: Option<String>,
    pub total_shipping_price_set: Option<PriceSet>,
    pub tags: Option<String>,
    pub fulfillment_status: Option<String>,
    pub financial_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub default_address: Option<Address>,
}

/// Postal address; used for both shipping and customer default addresses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceSet {
    pub shop_money: Option<Money>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Money {
    #[serde(deserialize_with = "amount")]
    pub amount: Option<String>,
    pub currency_code: Option<String>,
}

/// Body of `GET /orders.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrdersResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub orders: Vec<RawOrder>,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Prices arrive as decimal strings (`"1299.00"`); plain numbers are accepted
/// too. The text is kept as sent so no digits are lost to floating point.
fn amount<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Number(n)) => Some(n.to_string()),
        Some(Raw::Text(s)) => Some(s.trim().to_string()),
        None => None,
    })
}

fn text(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("")
}

impl RawOrder {
    pub fn name(&self) -> &str {
        text(&self.name)
    }

    pub fn created_at(&self) -> &str {
        text(&self.created_at)
    }

    pub fn email(&self) -> &str {
        text(&self.email)
    }

    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    pub fn order_phone(&self) -> &str {
        text(&self.phone)
    }

    pub fn customer_first_name(&self) -> &str {
        self.customer
            .as_ref()
            .map(|c| text(&c.first_name))
            .unwrap_or("")
    }

    pub fn customer_last_name(&self) -> &str {
        self.customer
            .as_ref()
            .map(|c| text(&c.last_name))
            .unwrap_or("")
    }

    pub fn customer_phone(&self) -> &str {
        self.customer.as_ref().map(|c| text(&c.phone)).unwrap_or("")
    }

    pub fn customer_default_address_phone(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|c| c.default_address.as_ref())
            .map(|a| text(&a.phone))
            .unwrap_or("")
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    pub fn shipping_phone(&self) -> &str {
        self.shipping_address()
            .map(|a| text(&a.phone))
            .unwrap_or("")
    }

    pub fn shipping_country(&self) -> &str {
        self.shipping_address()
            .map(|a| text(&a.country))
            .unwrap_or("")
    }

    /// One name per line item, in order; an unnamed item keeps its slot as `""`.
    pub fn line_item_names(&self) -> impl Iterator<Item = &str> {
        self.line_items.iter().map(|li| text(&li.name))
    }

    pub fn total_price(&self) -> Option<&str> {
        self.total_price.as_deref()
    }

    pub fn currency(&self) -> &str {
        text(&self.currency)
    }

    /// Shipping charged, in shop currency.
    pub fn shipping_shop_money(&self) -> Option<&Money> {
        self.total_shipping_price_set
            .as_ref()
            .and_then(|s| s.shop_money.as_ref())
    }

    pub fn fulfillment_status(&self) -> &str {
        text(&self.fulfillment_status)
    }

    pub fn financial_status(&self) -> &str {
        text(&self.financial_status)
    }
}

impl Address {
    /// The six display lines, in address order.
    pub fn lines(&self) -> [&str; 6] {
        [
            text(&self.address1),
            text(&self.address2),
            text(&self.city),
            text(&self.province),
            text(&self.zip),
            text(&self.country),
        ]
    }
}

impl Money {
    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn currency_code(&self) -> &str {
        text(&self.currency_code)
    }
}
