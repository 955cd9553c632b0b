//! Plain-text rendering of the grid.

use std::{collections::HashSet, fmt::Write as _};

use pathrunner_core::{CellCoord, Goals};
use pathrunner_world::GridWorld;

/// Markers drawn on top of the grid.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scene {
    pub(crate) agent: CellCoord,
    pub(crate) adversary: CellCoord,
    pub(crate) goals: Goals,
}

/// Draws the grid one row per line with cells separated by spaces.
///
/// `X` barrier, `A` agent, `E` adversary, `D` destination, `P` power-up,
/// `*` path cell, `.` open cell. Markers take precedence over the path.
pub(crate) fn render(
    grid: &GridWorld,
    scene: &Scene,
    path: impl IntoIterator<Item = CellCoord>,
) -> String {
    let path: HashSet<CellCoord> = path.into_iter().collect();
    let mut output = String::new();

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == scene.agent {
                'A'
            } else if cell == scene.adversary {
                'E'
            } else if cell == scene.goals.destination {
                'D'
            } else if cell == scene.goals.power_up {
                'P'
            } else if grid.is_static_barrier(cell) {
                'X'
            } else if path.contains(&cell) {
                '*'
            } else {
                '.'
            };
            if column > 0 {
                output.push(' ');
            }
            output.push(glyph);
        }
        output.push('\n');
    }

    output
}

/// One-line description of where the markers stand.
pub(crate) fn legend(scene: &Scene, has_capability: bool) -> String {
    let mut line = String::new();
    let _ = write!(
        line,
        "agent {} adversary {} destination {} power-up {}",
        format_cell(scene.agent),
        format_cell(scene.adversary),
        format_cell(scene.goals.destination),
        format_cell(scene.goals.power_up),
    );
    if has_capability {
        line.push_str(" [capability]");
    }
    line
}

/// Formats a cell as `(column, row)`.
pub(crate) fn format_cell(cell: CellCoord) -> String {
    format!("({}, {})", cell.column(), cell.row())
}
