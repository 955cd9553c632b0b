//! Composable blocking predicate combining static and transient obstacles.

use pathrunner_core::CellCoord;

use crate::GridWorld;

/// Cells currently impassable for the agent.
///
/// Static barriers block only until the capability is acquired; the
/// adversary's cell always blocks. Cells outside the grid are reported as
/// blocked so the predicate is safe to use on raw coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Blockers<'a> {
    grid: &'a GridWorld,
    adversary: Option<CellCoord>,
    has_capability: bool,
}

impl<'a> Blockers<'a> {
    /// Blocks static barriers only.
    #[must_use]
    pub const fn new(grid: &'a GridWorld) -> Self {
        Self {
            grid,
            adversary: None,
            has_capability: false,
        }
    }

    /// Adds the adversary's current cell to the blocked set.
    #[must_use]
    pub const fn with_adversary(mut self, cell: CellCoord) -> Self {
        self.adversary = Some(cell);
        self
    }

    /// Lifts static-barrier blocking when the capability is held.
    #[must_use]
    pub const fn with_capability(mut self, has_capability: bool) -> Self {
        self.has_capability = has_capability;
        self
    }

    /// Grid the predicate is evaluated against.
    #[must_use]
    pub const fn grid(&self) -> &'a GridWorld {
        self.grid
    }

    /// Cell occupied by the adversary, if one is tracked.
    #[must_use]
    pub const fn adversary(&self) -> Option<CellCoord> {
        self.adversary
    }

    /// Reports whether the agent may not enter the cell.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        if !self.grid.in_bounds(cell) {
            return true;
        }
        if self.adversary == Some(cell) {
            return true;
        }
        !self.has_capability && self.grid.is_static_barrier(cell)
    }
}
