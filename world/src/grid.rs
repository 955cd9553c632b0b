//! Static grid description: bounds and permanent barriers.

use pathrunner_core::CellCoord;

use crate::WorldError;

/// Moore neighborhood offsets in the fixed order neighbors are reported.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Bounded grid with a dense map of static barriers.
///
/// The grid never changes size after construction. Barriers are stored in
/// row-major order so membership checks are constant time and iteration is
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridWorld {
    columns: u32,
    rows: u32,
    barriers: Vec<bool>,
}

impl GridWorld {
    /// Creates an empty grid with the provided dimensions.
    ///
    /// Fails when either dimension is zero.
    pub fn new(columns: u32, rows: u32) -> Result<Self, WorldError> {
        if columns == 0 || rows == 0 {
            return Err(WorldError::EmptyGrid { columns, rows });
        }

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| WorldError::GridTooLarge { columns, rows })?;

        Ok(Self {
            columns,
            rows,
            barriers: vec![false; capacity],
        })
    }

    /// Creates a grid and marks every provided cell as a static barrier.
    ///
    /// Fails when a barrier lies outside the grid.
    pub fn with_barriers<I>(columns: u32, rows: u32, barriers: I) -> Result<Self, WorldError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut grid = Self::new(columns, rows)?;
        for cell in barriers {
            if !grid.in_bounds(cell) {
                return Err(WorldError::OutOfBounds {
                    what: "barrier",
                    cell,
                    columns,
                    rows,
                });
            }
            let _ = grid.place_barrier(cell);
        }
        Ok(grid)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell holds a static barrier.
    ///
    /// Cells outside the grid are never barriers; callers check bounds separately.
    #[must_use]
    pub fn is_static_barrier(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.barriers.get(index).copied())
            .unwrap_or(false)
    }

    /// Iterates over all static barriers in row-major order.
    pub fn barriers(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        self.barriers
            .iter()
            .enumerate()
            .filter(|(_, blocked)| **blocked)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % columns, index / columns))
            })
    }

    /// Number of cells currently holding a static barrier.
    #[must_use]
    pub fn barrier_count(&self) -> usize {
        self.barriers.iter().filter(|blocked| **blocked).count()
    }

    /// Iterates over the in-bounds cells of the 8-connected neighborhood.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        MOORE_OFFSETS
            .iter()
            .filter_map(move |&(column_delta, row_delta)| cell.offset(column_delta, row_delta))
            .filter(move |neighbor| self.in_bounds(*neighbor))
    }

    /// Clamps a cell into the grid bounds.
    #[must_use]
    pub fn clamp(&self, cell: CellCoord) -> CellCoord {
        CellCoord::new(
            cell.column().min(self.columns - 1),
            cell.row().min(self.rows - 1),
        )
    }

    /// Marks the cell as a barrier, returning `true` when the grid changed.
    pub(crate) fn place_barrier(&mut self, cell: CellCoord) -> bool {
        self.set_barrier(cell, true)
    }

    /// Clears the barrier on the cell, returning `true` when the grid changed.
    pub(crate) fn remove_barrier(&mut self, cell: CellCoord) -> bool {
        self.set_barrier(cell, false)
    }

    fn set_barrier(&mut self, cell: CellCoord, blocked: bool) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        let Some(slot) = self.barriers.get_mut(index) else {
            return false;
        };
        if *slot == blocked {
            return false;
        }
        *slot = blocked;
        true
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
