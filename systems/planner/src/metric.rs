//! Scaled integer octile metric for 8-directional movement.

use pathrunner_core::CellCoord;

/// Cost of an orthogonal step.
pub const ORTHOGONAL_STEP_COST: u32 = 10;

/// Cost of a diagonal step, the integer approximation of `10 * sqrt(2)`.
pub const DIAGONAL_STEP_COST: u32 = 14;

/// Cost of moving between two adjacent cells.
#[must_use]
pub fn step_cost(from: CellCoord, to: CellCoord) -> u32 {
    let diagonal = from.column() != to.column() && from.row() != to.row();
    if diagonal {
        DIAGONAL_STEP_COST
    } else {
        ORTHOGONAL_STEP_COST
    }
}

/// Octile distance between two cells.
///
/// Exact on an obstacle-free grid, so it never overestimates and is
/// monotone along every edge.
#[must_use]
pub fn octile_distance(from: CellCoord, to: CellCoord) -> u32 {
    let column_diff = from.column().abs_diff(to.column());
    let row_diff = from.row().abs_diff(to.row());
    let diagonal_steps = column_diff.min(row_diff);
    let straight_steps = column_diff.max(row_diff) - diagonal_steps;
    diagonal_steps
        .saturating_mul(DIAGONAL_STEP_COST)
        .saturating_add(straight_steps.saturating_mul(ORTHOGONAL_STEP_COST))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_cost_distinguishes_diagonals() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(step_cost(origin, CellCoord::new(3, 2)), ORTHOGONAL_STEP_COST);
        assert_eq!(step_cost(origin, CellCoord::new(2, 1)), ORTHOGONAL_STEP_COST);
        assert_eq!(step_cost(origin, CellCoord::new(1, 1)), DIAGONAL_STEP_COST);
    }

    #[test]
    fn octile_distance_combines_diagonal_and_straight_runs() {
        assert_eq!(octile_distance(CellCoord::new(0, 0), CellCoord::new(4, 4)), 56);
        assert_eq!(octile_distance(CellCoord::new(0, 0), CellCoord::new(5, 2)), 58);
        assert_eq!(octile_distance(CellCoord::new(5, 2), CellCoord::new(0, 0)), 58);
        assert_eq!(octile_distance(CellCoord::new(3, 3), CellCoord::new(3, 3)), 0);
    }

    #[test]
    fn heuristic_is_consistent_across_every_step() {
        let goal = CellCoord::new(6, 2);
        for column in 1..9 {
            for row in 1..9 {
                let cell = CellCoord::new(column, row);
                for (dc, dr) in [
                    (-1, -1),
                    (0, -1),
                    (1, -1),
                    (-1, 0),
                    (1, 0),
                    (-1, 1),
                    (0, 1),
                    (1, 1),
                ] {
                    let Some(next) = cell.offset(dc, dr) else {
                        continue;
                    };
                    assert!(
                        octile_distance(cell, goal)
                            <= step_cost(cell, next) + octile_distance(next, goal),
                        "heuristic not monotone from {cell:?} to {next:?}"
                    );
                }
            }
        }
    }
}
