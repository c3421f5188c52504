// src/orders/normalize.rs

use chrono_tz::Tz;

use super::format::{format_address, format_date, format_money, full_name};
use super::types::RawOrder;
use crate::schema::{Column, Row};

/// Flatten one order into a sheet row. Total: every column is set, missing
/// source data becomes an empty string.
pub fn normalize_order(order: &RawOrder, tz: Tz) -> Row {
    let shipping = order
        .shipping_shop_money()
        .map(|m| format_money(m.amount(), m.currency_code()))
        .unwrap_or_default();

    Row::builder()
        .set(Column::Order, order.name())
        .set(Column::Date, format_date(order.created_at(), tz))
        .set(
            Column::Customer,
            full_name(order.customer_first_name(), order.customer_last_name()),
        )
        .set(Column::Email, order.email())
        .set(Column::Phone, phone(order))
        .set(Column::Country, order.shipping_country())
        .set(
            Column::Products,
            order.line_item_names().collect::<Vec<_>>().join(", "),
        )
        .set(
            Column::Total,
            format_money(order.total_price(), order.currency()),
        )
        .set(Column::Shipping, shipping)
        .set(Column::Address, format_address(order.shipping_address()))
        .set(Column::Status, status(order))
        .build()
}

/// Order phone, then customer, then customer default address, then shipping address.
fn phone(order: &RawOrder) -> &str {
    [
        order.order_phone(),
        order.customer_phone(),
        order.customer_default_address_phone(),
        order.shipping_phone(),
    ]
    .into_iter()
    .find(|p| !p.trim().is_empty())
    .unwrap_or("")
}

fn status(order: &RawOrder) -> &str {
    match order.fulfillment_status() {
        "" => order.financial_status(),
        s => s,
    }
}
