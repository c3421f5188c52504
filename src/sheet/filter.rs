// src/sheet/filter.rs

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::{DataRange, FilterColumn, FilterCriterion, TabularSink};
use crate::schema::{Column, COLUMNS};

/// Column → trimmed, non-empty match text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    entries: Vec<(Column, String)>,
}

impl FilterSpec {
    /// Keep the entries of `candidate` that name one of `columns` and carry
    /// non-blank text. Unknown names are ignored.
    pub fn from_candidate(candidate: &HashMap<String, Option<String>>, columns: &[Column]) -> Self {
        for key in candidate.keys() {
            if Column::from_name(key).map_or(true, |c| !columns.contains(&c)) {
                debug!(column = %key, "ignoring filter for unknown column");
            }
        }
        let entries = columns
            .iter()
            .filter_map(|&c| {
                let value = candidate.get(c.name())?.as_deref()?.trim();
                (!value.is_empty()).then(|| (c, value.to_string()))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One "text contains" criterion per entry, positioned by `columns`.
    pub fn criteria(&self, columns: &[Column]) -> Vec<FilterColumn> {
        self.entries
            .iter()
            .filter_map(|(c, v)| {
                let col_id = columns.iter().position(|x| x == c)?;
                Some(FilterColumn {
                    col_id,
                    criterion: FilterCriterion::TextContains(v.clone()),
                })
            })
            .collect()
    }
}

/// Criteria for `candidate` over `columns`; the vector length is the number of
/// columns that will be filtered.
pub fn build_filter(
    candidate: &HashMap<String, Option<String>>,
    columns: &[Column],
) -> Vec<FilterColumn> {
    FilterSpec::from_candidate(candidate, columns).criteria(columns)
}

/// Replace the sheet's filter with one built from `candidate`; returns how many
/// columns got a criterion.
///
/// The previous filter is always removed first, so an empty candidate simply
/// clears the sheet. With no data rows (`last_row() < 2`) nothing is installed.
#[instrument(level = "info", skip_all)]
pub fn apply_filters(
    sink: &mut dyn TabularSink,
    candidate: &HashMap<String, Option<String>>,
) -> Result<usize> {
    let last_row = sink.last_row();
    sink.remove_filter();
    if last_row < 2 {
        info!(last_row, "no data rows; filters cleared");
        return Ok(0);
    }

    let criteria = build_filter(candidate, &COLUMNS);
    let applied = criteria.len();
    if applied == 0 {
        info!("empty filter request; filters cleared");
        return Ok(0);
    }

    let range = DataRange {
        first_row: 1,
        last_row,
        columns: COLUMNS.len(),
    };
    sink.create_filter(range, criteria)
        .with_context(|| format!("installing column filter on {}", sink.name()))?;
    info!(applied, "column filters applied");
    Ok(applied)
}

pub fn clear_filters(sink: &mut dyn TabularSink) {
    sink.remove_filter();
    info!("column filters cleared");
}
