pub mod format;
pub mod normalize;
pub mod sample;
pub mod tags;
pub mod types;

pub use format::{
    format_address, format_date, format_money, full_name, resolve_time_zone, DEFAULT_TIME_ZONE,
};
pub use normalize::normalize_order;
pub use sample::sample_rows;
pub use tags::{has_tag, COD_TAG};
pub use types::{Address, Customer, LineItem, Money, OrdersResponse, PriceSet, RawOrder};
