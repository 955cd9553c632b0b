#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A* path planner over the 8-connected grid.
//!
//! [`plan`] is a pure function: every call builds a fresh [`Search`] whose
//! frontier, closed set, g-cost and predecessor tables are dropped once the
//! result is known. Costs use the scaled integer octile metric from
//! [`metric`], and the frontier breaks f-cost ties on the lower cell so the
//! same inputs always produce the same path.

pub mod metric;
mod search;

pub use search::{Search, SearchStats};

use pathrunner_core::CellCoord;
use pathrunner_world::GridWorld;
use thiserror::Error;

/// Ordered list of cells from start to goal, both inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
    cost: u32,
}

impl Path {
    pub(crate) fn new(cells: Vec<CellCoord>, cost: u32) -> Self {
        debug_assert!(!cells.is_empty(), "paths always contain the start cell");
        Self { cells, cost }
    }

    /// Cells visited by the path, starting with the start cell.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> CellCoord {
        self.cells[0]
    }

    /// Last cell of the path.
    #[must_use]
    pub fn goal(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Total cost in metric units (10 per orthogonal, 14 per diagonal step).
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of cells on the path.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of moves needed to walk the path.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.cells.len() - 1
    }

    /// Consumes the path, yielding its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Outcome of a planning request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// A shortest path to the goal.
    Found(Path),
    /// The goal is not connected to the start under the current blocking.
    Unreachable,
}

impl SearchResult {
    /// Returns the path when one was found.
    #[must_use]
    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::Unreachable => None,
        }
    }

    /// Reports whether the goal was unreachable.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable)
    }
}

/// Contract violations detected before a search starts.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The start cell lies outside the grid.
    #[error("start {cell:?} lies outside the {columns}x{rows} grid")]
    StartOutOfBounds {
        /// Offending start cell.
        cell: CellCoord,
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
    /// The goal cell lies outside the grid.
    #[error("goal {cell:?} lies outside the {columns}x{rows} grid")]
    GoalOutOfBounds {
        /// Offending goal cell.
        cell: CellCoord,
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
}

/// Finds a shortest path from `start` to `goal`.
///
/// `is_blocked` decides which cells may not be entered; the start cell is
/// never tested against it. Returns [`SearchResult::Unreachable`] when the
/// frontier empties before the goal is popped.
#[tracing::instrument(level = "trace", skip(grid, is_blocked))]
pub fn plan<F>(
    grid: &GridWorld,
    start: CellCoord,
    goal: CellCoord,
    is_blocked: F,
) -> Result<SearchResult, PlanError>
where
    F: Fn(CellCoord) -> bool,
{
    Ok(Search::new(grid, start, goal, is_blocked)?.run())
}
