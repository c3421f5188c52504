// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use super::types::COLUMNS;

/// Arrow schema for the order sheet: one non-null Utf8 field per column.
pub fn build_arrow_schema() -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = COLUMNS
        .iter()
        .map(|col| ArrowField::new(col.name(), DataType::Utf8, /* nullable = */ false))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}
