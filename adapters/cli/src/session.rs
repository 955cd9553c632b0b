//! Tick pump wiring the world to the cursor system.

use pathrunner_core::{CellCoord, Command, Event, Layout};
use pathrunner_system_cursor::PathCursor;
use pathrunner_world::{self as world, query, World, WorldError};

use crate::ascii::Scene;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The agent stood on the destination after the given tick.
    Arrived {
        /// Tick on which the destination was reached.
        tick: u64,
    },
    /// The tick limit elapsed first.
    TickLimit,
}

/// Totals gathered over a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) moves: u64,
    pub(crate) objective_changes: u64,
    pub(crate) rejected_steps: u64,
    pub(crate) has_capability: bool,
    pub(crate) final_cell: CellCoord,
    pub(crate) outcome: Outcome,
}

/// Owns a world and the cursor system driving it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    cursor: PathCursor,
}

impl Session {
    pub(crate) fn new(layout: &Layout) -> Result<Self, WorldError> {
        Ok(Self {
            world: World::new(layout)?,
            cursor: PathCursor::new(),
        })
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Current markers for rendering.
    pub(crate) fn scene(&self) -> Scene {
        let session = query::session(&self.world);
        Scene {
            agent: session.agent.cell,
            adversary: session.adversary.cell,
            goals: session.goals,
        }
    }

    /// Cells the cursor still intends to walk.
    pub(crate) fn held_path(&self) -> Vec<CellCoord> {
        self.cursor.remaining().collect()
    }

    /// Applies a command and pumps the resulting events through the cursor
    /// until no further commands are produced. Returns every event emitted.
    pub(crate) fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            log.extend(events.iter().cloned());
            let session = query::session(&self.world);
            let mut commands = Vec::new();
            self.cursor
                .handle(&events, query::grid(&self.world), &session, &mut commands);

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        log
    }

    /// Ticks until the destination is reached or `max_ticks` elapse.
    ///
    /// `on_tick` observes the session after every tick.
    pub(crate) fn run(
        &mut self,
        max_ticks: u64,
        mut on_tick: impl FnMut(&Self, u64),
    ) -> RunSummary {
        let mut moves = 0;
        let mut objective_changes = 0;
        let mut rejected_steps = 0;
        let mut outcome = Outcome::TickLimit;

        for _ in 0..max_ticks {
            let events = self.submit(Command::Tick);
            let tick = query::session(&self.world).tick;

            for event in &events {
                match event {
                    Event::AgentAdvanced { .. } => moves += 1,
                    Event::ObjectiveChanged { objective } => {
                        objective_changes += 1;
                        tracing::info!(tick, ?objective, "objective changed");
                    }
                    Event::CapabilityAcquired { cell } => {
                        tracing::info!(tick, ?cell, "capability acquired");
                    }
                    Event::StepRejected { to, reason } => {
                        rejected_steps += 1;
                        tracing::warn!(tick, ?to, ?reason, "step rejected");
                    }
                    _ => {}
                }
            }

            on_tick(self, tick);

            if events
                .iter()
                .any(|event| matches!(event, Event::DestinationReached { .. }))
            {
                tracing::info!(tick, "destination reached");
                outcome = Outcome::Arrived { tick };
                break;
            }
        }

        let session = query::session(&self.world);
        RunSummary {
            ticks: session.tick,
            moves,
            objective_changes,
            rejected_steps,
            has_capability: session.agent.has_capability,
            final_cell: session.agent.cell,
            outcome,
        }
    }
}
