// src/schema/types.rs

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// One column of the order sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Order,
    Date,
    Customer,
    Email,
    Phone,
    Country,
    Products,
    Total,
    Shipping,
    Address,
    Status,
}

/// Every column, in sheet order.
pub const COLUMNS: [Column; 11] = [
    Column::Order,
    Column::Date,
    Column::Customer,
    Column::Email,
    Column::Phone,
    Column::Country,
    Column::Products,
    Column::Total,
    Column::Shipping,
    Column::Address,
    Column::Status,
];

impl Column {
    /// Header text, also the key used by filter requests and JSON output.
    pub fn name(self) -> &'static str {
        match self {
            Column::Order => "Order",
            Column::Date => "Date",
            Column::Customer => "Customer",
            Column::Email => "Email",
            Column::Phone => "Phone",
            Column::Country => "Country",
            Column::Products => "Products",
            Column::Total => "Total",
            Column::Shipping => "Shipping",
            Column::Address => "Address",
            Column::Status => "Status",
        }
    }

    /// 0-based position within [`COLUMNS`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(s: &str) -> Option<Self> {
        COLUMNS.iter().copied().find(|c| c.name() == s)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The header row as written to the sheet.
pub fn header() -> Vec<String> {
    COLUMNS.iter().map(|c| c.name().to_string()).collect()
}

/// A flattened order: exactly one string per column, in sheet order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    values: [String; 11],
}

impl Row {
    pub fn builder() -> RowBuilder {
        RowBuilder::default()
    }

    pub fn get(&self, column: Column) -> &str {
        &self.values[column.index()]
    }

    /// `(column, value)` pairs in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &str)> {
        COLUMNS.iter().map(move |&c| (c, self.get(c)))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_values(self) -> Vec<String> {
        self.values.into()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMNS.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column.name(), value)?;
        }
        map.end()
    }
}

/// Collects column values; unset columns stay empty.
#[derive(Debug, Default)]
pub struct RowBuilder {
    values: [String; 11],
}

impl RowBuilder {
    pub fn set(mut self, column: Column, value: impl Into<String>) -> Self {
        self.values[column.index()] = value.into();
        self
    }

    pub fn build(self) -> Row {
        Row {
            values: self.values,
        }
    }
}
