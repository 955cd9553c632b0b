#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Pathrunner.

pub mod adversary;
mod blockers;
mod error;
mod grid;

pub use blockers::Blockers;
pub use error::WorldError;
pub use grid::GridWorld;

use pathrunner_core::{
    AdversaryState, AgentState, CellCoord, Command, EditError, Event, Goals, Layout, Marker,
    Objective, StepError, WELCOME_BANNER,
};

/// Marker positions a reset returns to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Markers {
    agent: CellCoord,
    adversary: CellCoord,
    destination: CellCoord,
    power_up: CellCoord,
}

impl Markers {
    fn set(&mut self, marker: Marker, cell: CellCoord) {
        match marker {
            Marker::Agent => self.agent = cell,
            Marker::Adversary => self.adversary = cell,
            Marker::Destination => self.destination = cell,
            Marker::PowerUp => self.power_up = cell,
        }
    }

    fn contains(&self, cell: CellCoord) -> bool {
        [self.agent, self.adversary, self.destination, self.power_up].contains(&cell)
    }

    fn clamped_to(self, grid: &GridWorld) -> Self {
        Self {
            agent: grid.clamp(self.agent),
            adversary: grid.clamp(self.adversary),
            destination: grid.clamp(self.destination),
            power_up: grid.clamp(self.power_up),
        }
    }
}

/// Represents the authoritative Pathrunner session state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    grid: GridWorld,
    initial: Markers,
    agent: AgentState,
    adversary: AdversaryState,
    goals: Goals,
    objective: Objective,
    tick_index: u64,
}

impl World {
    /// Builds a world from the provided layout.
    ///
    /// Fails fast when the grid is empty, when any marker or barrier lies
    /// outside the grid, or when a marker sits on a barrier.
    pub fn new(layout: &Layout) -> Result<Self, WorldError> {
        let grid =
            GridWorld::with_barriers(layout.columns, layout.rows, layout.barriers.iter().copied())?;

        let markers = [
            (Marker::Agent, "agent", layout.agent),
            (Marker::Adversary, "adversary", layout.adversary),
            (Marker::Destination, "destination", layout.destination),
            (Marker::PowerUp, "power-up", layout.power_up),
        ];
        for (marker, what, cell) in markers {
            if !grid.in_bounds(cell) {
                return Err(WorldError::OutOfBounds {
                    what,
                    cell,
                    columns: layout.columns,
                    rows: layout.rows,
                });
            }
            if grid.is_static_barrier(cell) {
                return Err(WorldError::MarkerOnBarrier { marker, cell });
            }
        }

        let initial = Markers {
            agent: layout.agent,
            adversary: layout.adversary,
            destination: layout.destination,
            power_up: layout.power_up,
        };

        let mut world = Self {
            banner: WELCOME_BANNER,
            grid,
            initial,
            agent: AgentState::at(initial.agent),
            adversary: AdversaryState::at(initial.adversary),
            goals: layout.goals(),
            objective: Objective::Primary,
            tick_index: 0,
        };
        world.reset_session();
        Ok(world)
    }

    fn reset_session(&mut self) {
        self.agent = AgentState::at(self.initial.agent);
        self.adversary = AdversaryState::at(self.initial.adversary);
        self.goals = Goals {
            destination: self.initial.destination,
            power_up: self.initial.power_up,
        };
        self.objective = Objective::Primary;
        self.tick_index = 0;
    }

    fn marker_at(&self, cell: CellCoord) -> Option<Marker> {
        if self.agent.cell == cell {
            Some(Marker::Agent)
        } else if self.adversary.cell == cell {
            Some(Marker::Adversary)
        } else if self.goals.destination == cell {
            Some(Marker::Destination)
        } else if self.goals.power_up == cell {
            Some(Marker::PowerUp)
        } else {
            None
        }
    }

    fn agent_blockers(&self) -> Blockers<'_> {
        Blockers::new(&self.grid)
            .with_adversary(self.adversary.cell)
            .with_capability(self.agent.has_capability)
    }

    fn step_agent(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        let from = self.agent.cell;
        let rejection = if !self.grid.in_bounds(to) {
            Some(StepError::OutOfBounds)
        } else if !from.is_adjacent(to) {
            Some(StepError::NotAdjacent)
        } else if self.agent_blockers().is_blocked(to) {
            Some(StepError::Blocked)
        } else {
            None
        };

        if let Some(reason) = rejection {
            tracing::debug!(?from, ?to, ?reason, "agent step rejected");
            out_events.push(Event::StepRejected { to, reason });
            return;
        }

        self.agent.cell = to;
        out_events.push(Event::AgentAdvanced { from, to });

        if to == self.goals.power_up && !self.agent.has_capability {
            self.agent.has_capability = true;
            out_events.push(Event::CapabilityAcquired { cell: to });
        }

        if to == self.goals.destination {
            out_events.push(Event::DestinationReached { cell: to });
        }
    }

    fn step_adversary(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        let from = self.adversary.cell;
        let rejection = if !self.grid.in_bounds(to) {
            Some(StepError::OutOfBounds)
        } else if !from.is_adjacent(to) {
            Some(StepError::NotAdjacent)
        } else {
            None
        };

        if let Some(reason) = rejection {
            tracing::debug!(?from, ?to, ?reason, "adversary step rejected");
            out_events.push(Event::StepRejected { to, reason });
            return;
        }

        self.adversary.cell = to;
        out_events.push(Event::AdversaryAdvanced { from, to });
    }

    fn place_barrier(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if !self.grid.in_bounds(cell) {
            out_events.push(Event::EditRejected {
                cell,
                reason: EditError::OutOfBounds,
            });
            return;
        }
        // Reset positions stay reserved while their marker is elsewhere.
        if self.marker_at(cell).is_some() || self.initial.contains(cell) {
            out_events.push(Event::EditRejected {
                cell,
                reason: EditError::OccupiedByMarker,
            });
            return;
        }
        if self.grid.place_barrier(cell) {
            out_events.push(Event::BarrierPlaced { cell });
        }
    }

    fn remove_barrier(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if !self.grid.in_bounds(cell) {
            out_events.push(Event::EditRejected {
                cell,
                reason: EditError::OutOfBounds,
            });
            return;
        }
        if self.grid.remove_barrier(cell) {
            out_events.push(Event::BarrierRemoved { cell });
        }
    }

    fn place_marker(&mut self, marker: Marker, cell: CellCoord, out_events: &mut Vec<Event>) {
        let rejection = if !self.grid.in_bounds(cell) {
            Some(EditError::OutOfBounds)
        } else if self.grid.is_static_barrier(cell) {
            Some(EditError::OccupiedByBarrier)
        } else {
            None
        };

        if let Some(reason) = rejection {
            out_events.push(Event::EditRejected { cell, reason });
            return;
        }

        self.initial.set(marker, cell);
        match marker {
            Marker::Agent => self.agent.cell = cell,
            Marker::Adversary => self.adversary.cell = cell,
            Marker::Destination => self.goals.destination = cell,
            Marker::PowerUp => self.goals.power_up = cell,
        }
        out_events.push(Event::MarkerPlaced { marker, cell });
    }

    fn configure_grid(&mut self, columns: u32, rows: u32, out_events: &mut Vec<Event>) {
        let grid = match GridWorld::new(columns, rows) {
            Ok(grid) => grid,
            Err(error) => {
                tracing::warn!(%error, "grid configuration ignored");
                return;
            }
        };

        self.initial = self.initial.clamped_to(&grid);
        self.grid = grid;
        self.reset_session();
        out_events.push(Event::GridConfigured { columns, rows });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            world.configure_grid(columns, rows, out_events);
        }
        Command::PlaceBarrier { cell } => world.place_barrier(cell, out_events),
        Command::RemoveBarrier { cell } => world.remove_barrier(cell, out_events),
        Command::PlaceMarker { marker, cell } => world.place_marker(marker, cell, out_events),
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StepAgent { to } => world.step_agent(to, out_events),
        Command::StepAdversary { to } => world.step_adversary(to, out_events),
        Command::SetObjective { objective } => {
            if world.objective != objective {
                world.objective = objective;
                out_events.push(Event::ObjectiveChanged { objective });
            }
        }
        Command::Reset => {
            world.reset_session();
            out_events.push(Event::SessionReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use pathrunner_core::{AdversaryState, AgentState, Goals, Layout, Objective};

    use super::{Blockers, GridWorld, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridWorld {
        &world.grid
    }

    /// Blocking predicate the agent is subject to right now.
    #[must_use]
    pub fn blockers(world: &World) -> Blockers<'_> {
        world.agent_blockers()
    }

    /// Captures the mutable session state in a single snapshot.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            agent: world.agent,
            adversary: world.adversary,
            goals: world.goals,
            objective: world.objective,
            tick: world.tick_index,
        }
    }

    /// Captures the current arrangement so it can be persisted or reloaded.
    ///
    /// Markers are reported at their reset positions, which is where the
    /// layout places them when loaded again.
    #[must_use]
    pub fn layout(world: &World) -> Layout {
        Layout {
            columns: world.grid.columns(),
            rows: world.grid.rows(),
            agent: world.initial.agent,
            adversary: world.initial.adversary,
            destination: world.initial.destination,
            power_up: world.initial.power_up,
            barriers: world.grid.barriers().collect(),
        }
    }

    /// Immutable copy of the per-tick session state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SessionSnapshot {
        /// Agent position and capability.
        pub agent: AgentState,
        /// Adversary position.
        pub adversary: AdversaryState,
        /// Destination and power-up cells.
        pub goals: Goals,
        /// Objective recorded for the agent.
        pub objective: Objective,
        /// Ticks elapsed since the session started or was reset.
        pub tick: u64,
    }
}
