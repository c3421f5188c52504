// src/sheet/mod.rs

pub mod export;
pub mod filter;
pub mod grid;

use thiserror::Error;

pub use export::write_parquet;
pub use filter::{apply_filters, build_filter, clear_filters, FilterSpec};
pub use grid::Grid;

/// Name of the sheet the orders are written to.
pub const SHEET_NAME: &str = "COD Orders";

/// Errors raised by a [`TabularSink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("filter range rows {first}..={last} exceed the sheet's {rows} rows")]
    RowsOutOfRange {
        first: usize,
        last: usize,
        rows: usize,
    },
    #[error("filter column {col_id} is outside a {width}-column range")]
    ColumnOutOfRange { col_id: usize, width: usize },
}

/// A block of the sheet: 1-based inclusive rows starting at the header, and
/// `columns` columns from the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
    pub first_row: usize,
    pub last_row: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCriterion {
    /// Cell text contains the pattern, ignoring case.
    TextContains(String),
}

impl FilterCriterion {
    pub fn matches(&self, cell: &str) -> bool {
        match self {
            FilterCriterion::TextContains(pattern) => {
                cell.to_lowercase().contains(&pattern.to_lowercase())
            }
        }
    }
}

/// A criterion on one column. `col_id` is the 0-based offset within the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterColumn {
    pub col_id: usize,
    pub criterion: FilterCriterion,
}

/// The filter currently installed on a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetFilter {
    pub range: DataRange,
    pub columns: Vec<FilterColumn>,
}

/// The grid the order rows are written to.
///
/// A sheet holds at most one filter; installing a new one requires removing
/// the old one first.
pub trait TabularSink {
    /// The fixed sheet this sink addresses.
    fn name(&self) -> &str {
        SHEET_NAME
    }

    /// Replace the sheet contents with a bold, frozen `header` followed by `rows`.
    /// Any installed filter is dropped.
    fn write_table(&mut self, header: &[String], rows: &[Vec<String>]) -> Result<(), SinkError>;

    /// 1-based index of the last non-empty row; 0 for an empty sheet, 1 for header only.
    fn last_row(&self) -> usize;

    /// Remove the installed filter, if any.
    fn remove_filter(&mut self);

    fn create_filter(
        &mut self,
        range: DataRange,
        columns: Vec<FilterColumn>,
    ) -> Result<(), SinkError>;
}
