#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pathrunner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Pathrunner: A* chase across the grid.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with an empty one of the provided dimensions.
    ///
    /// Markers that fall outside the new bounds are clamped into it.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
    },
    /// Requests that a static barrier be placed on the provided cell.
    PlaceBarrier {
        /// Cell that should become impassable.
        cell: CellCoord,
    },
    /// Requests that a static barrier be removed from the provided cell.
    RemoveBarrier {
        /// Cell that should become passable again.
        cell: CellCoord,
    },
    /// Moves one of the session markers to a new cell.
    PlaceMarker {
        /// Marker being repositioned.
        marker: Marker,
        /// Destination cell of the marker.
        cell: CellCoord,
    },
    /// Advances the control loop by a single tick.
    Tick,
    /// Requests that the agent advance a single step onto an adjacent cell.
    StepAgent {
        /// Cell the agent should occupy after the step.
        to: CellCoord,
    },
    /// Requests that the adversary advance a single step onto an adjacent cell.
    StepAdversary {
        /// Cell the adversary should occupy after the step.
        to: CellCoord,
    },
    /// Records the objective the agent is currently pursuing.
    SetObjective {
        /// Objective that should become active.
        objective: Objective,
    },
    /// Restores agent, adversary, capability and objective to the initial layout.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was replaced with new dimensions.
    GridConfigured {
        /// Number of cell columns in the new grid.
        columns: u32,
        /// Number of cell rows in the new grid.
        rows: u32,
    },
    /// Confirms that a static barrier now occupies the cell.
    BarrierPlaced {
        /// Cell that became impassable.
        cell: CellCoord,
    },
    /// Confirms that a static barrier was cleared from the cell.
    BarrierRemoved {
        /// Cell that became passable.
        cell: CellCoord,
    },
    /// Confirms that a marker was moved by an editing command.
    MarkerPlaced {
        /// Marker that moved.
        marker: Marker,
        /// Cell the marker occupies now.
        cell: CellCoord,
    },
    /// Reports that an editing command was refused.
    EditRejected {
        /// Cell targeted by the edit.
        cell: CellCoord,
        /// Specific reason the edit failed.
        reason: EditError,
    },
    /// Indicates that the control loop advanced by one tick.
    TimeAdvanced {
        /// Number of ticks elapsed since the session started or was reset.
        tick: u64,
    },
    /// Confirms that the agent moved between two cells.
    AgentAdvanced {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after the move.
        to: CellCoord,
    },
    /// Confirms that the adversary moved between two cells.
    AdversaryAdvanced {
        /// Cell the adversary occupied before moving.
        from: CellCoord,
        /// Cell the adversary occupies after the move.
        to: CellCoord,
    },
    /// Reports that a step request was refused.
    StepRejected {
        /// Cell the rejected step targeted.
        to: CellCoord,
        /// Specific reason the step failed.
        reason: StepError,
    },
    /// Announces that the agent picked up the barrier-breaking capability.
    CapabilityAcquired {
        /// Cell of the power-up that granted the capability.
        cell: CellCoord,
    },
    /// Announces that the agent arrived on the destination.
    DestinationReached {
        /// Destination cell.
        cell: CellCoord,
    },
    /// Announces that the agent now pursues a different objective.
    ObjectiveChanged {
        /// Objective that became active.
        objective: Objective,
    },
    /// Confirms that the session returned to its initial layout.
    SessionReset,
}

/// Session markers that an editor may reposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// The pathfinding agent.
    Agent,
    /// The moving adversary.
    Adversary,
    /// The primary goal.
    Destination,
    /// The secondary goal granting the barrier-breaking capability.
    PowerUp,
}

/// Goal currently pursued by the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Objective {
    /// Head for the destination.
    #[default]
    Primary,
    /// Head for the power-up that unlocks passage through barriers.
    Secondary,
}

impl Objective {
    /// Returns the objective on the other side of the fallback transition.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Ordering is lexicographic on `(column, row)` and is used as the frontier
/// tie-break during search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Number of king moves separating two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Reports whether `other` lies in the 8-connected neighborhood of `self`.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.chebyshev_distance(other) == 1
    }

    /// Offsets the cell, returning `None` when a coordinate would go negative.
    #[must_use]
    pub fn offset(self, column_delta: i32, row_delta: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(Self::new(column, row))
    }
}

/// Pathfinding agent state tracked across ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentState {
    /// Cell currently occupied by the agent.
    pub cell: CellCoord,
    /// Whether the agent may pass through static barriers.
    pub has_capability: bool,
}

impl AgentState {
    /// Creates an agent standing on `cell` without the capability.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            has_capability: false,
        }
    }
}

/// Adversary state tracked across ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AdversaryState {
    /// Cell currently occupied by the adversary.
    pub cell: CellCoord,
}

impl AdversaryState {
    /// Creates an adversary standing on `cell`.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self { cell }
    }
}

/// Cells of the two goals the agent may pursue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Goals {
    /// Primary goal.
    pub destination: CellCoord,
    /// Secondary goal granting the capability.
    pub power_up: CellCoord,
}

impl Goals {
    /// Resolves the cell associated with an objective.
    #[must_use]
    pub const fn cell_for(&self, objective: Objective) -> CellCoord {
        match objective {
            Objective::Primary => self.destination,
            Objective::Secondary => self.power_up,
        }
    }
}

/// Initial arrangement of a session: grid size, markers and barriers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Starting cell of the agent.
    pub agent: CellCoord,
    /// Starting cell of the adversary.
    pub adversary: CellCoord,
    /// Primary goal.
    pub destination: CellCoord,
    /// Secondary goal.
    pub power_up: CellCoord,
    /// Static barriers.
    #[serde(default)]
    pub barriers: Vec<CellCoord>,
}

impl Layout {
    /// Returns the goal pair described by the layout.
    #[must_use]
    pub const fn goals(&self) -> Goals {
        Goals {
            destination: self.destination,
            power_up: self.power_up,
        }
    }
}

/// Reasons a step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is not in the 8-connected neighborhood.
    NotAdjacent,
    /// The requested cell is impassable for the mover.
    Blocked,
}

/// Reasons an editing request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditError {
    /// The targeted cell lies outside the grid.
    OutOfBounds,
    /// A barrier cannot share a cell with a marker.
    OccupiedByMarker,
    /// A marker cannot be placed on a barrier.
    OccupiedByBarrier,
}
