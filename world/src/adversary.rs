//! Deterministic motion rule followed by the adversary.

use pathrunner_core::CellCoord;

/// Computes the adversary's next cell.
///
/// The adversary moves up one row from even rows and down one row from odd
/// rows, so it bounces between two rows with period two. A move that would
/// leave the grid is reversed; on a single-row grid the adversary stays put.
/// Barriers do not affect the rule.
#[must_use]
pub fn next_cell(cell: CellCoord, rows: u32) -> CellCoord {
    let preferred: i32 = if cell.row() % 2 == 0 { -1 } else { 1 };

    for row_delta in [preferred, -preferred] {
        if let Some(candidate) = cell.offset(0, row_delta) {
            if candidate.row() < rows {
                return candidate;
            }
        }
    }

    cell
}
