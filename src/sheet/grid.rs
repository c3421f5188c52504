// src/sheet/grid.rs

use tracing::debug;

use super::{DataRange, FilterColumn, SheetFilter, SinkError, TabularSink};

/// In-memory sheet: a header row, data rows and at most one filter.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    /// Row 1 is the header when the sheet is non-empty.
    cells: Vec<Vec<String>>,
    header_bold: bool,
    frozen_rows: usize,
    filter: Option<SheetFilter>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &[String] {
        self.cells.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.cells.get(1..).unwrap_or(&[])
    }

    pub fn header_bold(&self) -> bool {
        self.header_bold
    }

    pub fn frozen_rows(&self) -> usize {
        self.frozen_rows
    }

    pub fn filter(&self) -> Option<&SheetFilter> {
        self.filter.as_ref()
    }

    /// Data rows that pass every criterion of the installed filter; all data
    /// rows when unfiltered.
    pub fn visible_rows(&self) -> Vec<&[String]> {
        let data = self.data_rows();
        let Some(filter) = &self.filter else {
            return data.iter().map(Vec::as_slice).collect();
        };
        // range rows are 1-based and include the header
        let last = filter.range.last_row.saturating_sub(1).min(data.len());
        data.iter()
            .enumerate()
            .filter(|(i, row)| {
                *i >= last
                    || filter.columns.iter().all(|fc| {
                        row.get(fc.col_id)
                            .is_some_and(|cell| fc.criterion.matches(cell))
                    })
            })
            .map(|(_, row)| row.as_slice())
            .collect()
    }
}

impl TabularSink for Grid {
    fn write_table(&mut self, header: &[String], rows: &[Vec<String>]) -> Result<(), SinkError> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != header.len()) {
            return Err(SinkError::RaggedRow {
                row: i + 2,
                found: row.len(),
                expected: header.len(),
            });
        }
        self.filter = None;
        self.cells = std::iter::once(header.to_vec())
            .chain(rows.iter().cloned())
            .collect();
        self.header_bold = true;
        self.frozen_rows = 1;
        debug!(sheet = self.name(), rows = rows.len(), "grid rewritten");
        Ok(())
    }

    fn last_row(&self) -> usize {
        self.cells.len()
    }

    fn remove_filter(&mut self) {
        if self.filter.take().is_some() {
            debug!("grid filter removed");
        }
    }

    fn create_filter(
        &mut self,
        range: DataRange,
        columns: Vec<FilterColumn>,
    ) -> Result<(), SinkError> {
        if range.first_row == 0 || range.first_row > range.last_row || range.last_row > self.cells.len() {
            return Err(SinkError::RowsOutOfRange {
                first: range.first_row,
                last: range.last_row,
                rows: self.cells.len(),
            });
        }
        if let Some(fc) = columns.iter().find(|fc| fc.col_id >= range.columns) {
            return Err(SinkError::ColumnOutOfRange {
                col_id: fc.col_id,
                width: range.columns,
            });
        }
        self.filter = Some(SheetFilter { range, columns });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{FilterCriterion, SHEET_NAME};

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn grid() -> Grid {
        let mut g = Grid::new();
        g.write_table(
            &strings(&["Order", "Country"]),
            &[strings(&["#1", "Türkiye"]), strings(&["#2", "Germany"])],
        )
        .unwrap();
        g
    }

    #[test]
    fn write_sets_header_style_and_drops_filter() {
        let mut g = grid();
        assert_eq!(g.last_row(), 3);
        assert!(g.header_bold());
        assert_eq!(g.frozen_rows(), 1);

        g.create_filter(
            DataRange {
                first_row: 1,
                last_row: 3,
                columns: 2,
            },
            vec![],
        )
        .unwrap();
        g.write_table(&strings(&["Order", "Country"]), &[]).unwrap();
        assert!(g.filter().is_none());
        assert_eq!(g.last_row(), 1);
        assert!(g.data_rows().is_empty());
    }

    #[test]
    fn grid_addresses_the_orders_sheet() {
        let g = grid();
        assert_eq!(g.name(), SHEET_NAME);
        assert_eq!(Grid::new().name(), "COD Orders");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut g = Grid::new();
        let err = g
            .write_table(&strings(&["A", "B"]), &[strings(&["only one"])])
            .unwrap_err();
        assert_eq!(
            err,
            SinkError::RaggedRow {
                row: 2,
                found: 1,
                expected: 2
            }
        );
        assert_eq!(g.last_row(), 0);
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let mut g = grid();
        g.create_filter(
            DataRange {
                first_row: 1,
                last_row: 3,
                columns: 2,
            },
            vec![FilterColumn {
                col_id: 1,
                criterion: FilterCriterion::TextContains("TÜRK".into()),
            }],
        )
        .unwrap();
        let visible = g.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0][0], "#1");
    }

    #[test]
    fn out_of_range_filters_are_rejected() {
        let mut g = grid();
        let rows = DataRange {
            first_row: 1,
            last_row: 9,
            columns: 2,
        };
        assert!(matches!(
            g.create_filter(rows, vec![]),
            Err(SinkError::RowsOutOfRange { .. })
        ));

        let cols = DataRange {
            first_row: 1,
            last_row: 3,
            columns: 2,
        };
        let far = FilterColumn {
            col_id: 5,
            criterion: FilterCriterion::TextContains("x".into()),
        };
        assert_eq!(
            g.create_filter(cols, vec![far]),
            Err(SinkError::ColumnOutOfRange { col_id: 5, width: 2 })
        );
        assert!(g.filter().is_none());
    }
}
