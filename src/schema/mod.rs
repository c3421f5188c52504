pub mod arrow;
pub mod types;

pub use self::arrow::build_arrow_schema;
pub use types::{header, Column, Row, RowBuilder, COLUMNS};
