// src/orders/sample.rs

use crate::schema::{Column, Row};

/// Fixed rows shown when no store credentials are configured.
pub fn sample_rows() -> Vec<Row> {
    vec![
        Row::builder()
            .set(Column::Order, "#1001")
            .set(Column::Date, "2024-01-15 10:30")
            .set(Column::Customer, "Ahmet Yılmaz")
            .set(Column::Email, "ahmet@example.com")
            .set(Column::Phone, "+90 532 111 2233")
            .set(Column::Country, "Türkiye")
            .set(Column::Products, "Bluetooth Speaker, USB-C Cable")
            .set(Column::Total, "1299 TRY")
            .set(Column::Shipping, "49 TRY")
            .set(
                Column::Address,
                "Atatürk Cd. No:12, Kadıköy, Istanbul, 34710, Türkiye",
            )
            .set(Column::Status, "pending")
            .build(),
        Row::builder()
            .set(Column::Order, "#1002")
            .set(Column::Date, "2024-01-16 14:05")
            .set(Column::Customer, "Elif Demir")
            .set(Column::Email, "elif@example.com")
            .set(Column::Phone, "+90 533 444 5566")
            .set(Column::Country, "Türkiye")
            .set(Column::Products, "Coffee Grinder")
            .set(Column::Total, "849.5 TRY")
            .set(Column::Shipping, "")
            .set(Column::Address, "Kızılay Mh. 5, Çankaya, Ankara, 06420, Türkiye")
            .set(Column::Status, "fulfilled")
            .build(),
    ]
}
