use std::cmp::Ordering;

use crate::domain::entities::page::SortDirection;
use crate::domain::entities::row::{CellValue, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Header activation cycle: none, ascending, descending, none. Switching to another
/// column starts over at ascending.
pub fn next_sort(current: Option<&SortState>, column: &str) -> Option<SortState> {
    match current {
        Some(state) if state.column == column => match state.direction {
            SortDirection::Asc => Some(SortState {
                column: column.to_string(),
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortState {
            column: column.to_string(),
            direction: SortDirection::Asc,
        }),
    }
}

fn rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Null => 0,
        CellValue::Bool(_) => 1,
        CellValue::Number(_) => 2,
        CellValue::Date(_) => 3,
        CellValue::Text(_) => 4,
    }
}

pub fn compare_cells(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
        (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
        (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
        (CellValue::Text(a), CellValue::Text(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        _ => rank(left).cmp(&rank(right)),
    }
}

/// Stable sort of row indices by one column.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], sort: &SortState) {
    indices.sort_by(|left, right| {
        let ordering = compare_cells(
            rows[*left].get(&sort.column),
            rows[*right].get(&sort.column),
        );
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
