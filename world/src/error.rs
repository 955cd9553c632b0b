//! Construction errors raised when a session layout is malformed.

use pathrunner_core::{CellCoord, Marker};
use thiserror::Error;

/// Errors reported while building a grid or a world from a layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// At least one grid dimension was zero.
    #[error("grid dimensions {columns}x{rows} must both be positive")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The grid holds more cells than the platform can address.
    #[error("grid dimensions {columns}x{rows} are too large")]
    GridTooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// A layout entry referenced a cell outside the grid.
    #[error("{what} at {cell:?} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Kind of layout entry that was out of bounds.
        what: &'static str,
        /// Offending cell.
        cell: CellCoord,
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
    /// A marker was placed on a static barrier.
    #[error("{marker:?} at {cell:?} sits on a static barrier")]
    MarkerOnBarrier {
        /// Marker that overlaps a barrier.
        marker: Marker,
        /// Offending cell.
        cell: CellCoord,
    },
}
