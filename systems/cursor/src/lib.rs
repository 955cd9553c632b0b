#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick path consumption: plan, step, move the adversary, replan.
//!
//! Every tick performs exactly one action. A tick that has no valid path
//! plans one; a tick that holds a path walks one cell of it and then moves
//! the adversary. The held path is checked against the current blocking
//! before each move, so barrier edits and adversary motion between ticks
//! are picked up by replanning rather than by walking into them.

use std::collections::VecDeque;

use pathrunner_core::{
    AdversaryState, AgentState, CellCoord, Command, Event, Goals, Marker, Objective,
};
use pathrunner_system_objective::ObjectiveSelector;
use pathrunner_system_planner::{plan, SearchResult};
use pathrunner_world::{adversary, query::SessionSnapshot, Blockers, GridWorld};

/// State threaded through consecutive control steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepState {
    /// Agent position and capability.
    pub agent: AgentState,
    /// Adversary position.
    pub adversary: AdversaryState,
    /// Objective the agent pursues.
    pub objective: Objective,
}

impl From<&SessionSnapshot> for StepState {
    fn from(session: &SessionSnapshot) -> Self {
        Self {
            agent: session.agent,
            adversary: session.adversary,
            objective: session.objective,
        }
    }
}

/// What a single control step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAction {
    /// A path to `goal` was planned; nothing moved.
    Planned {
        /// Cell the path leads to.
        goal: CellCoord,
        /// Number of moves on the new path.
        steps: usize,
    },
    /// The active goal could not be reached and the objective flipped.
    Unreachable {
        /// Goal that failed.
        goal: CellCoord,
    },
    /// The agent walked one cell and the adversary moved.
    Moved {
        /// Cell the agent left.
        from: CellCoord,
        /// Cell the agent entered.
        to: CellCoord,
    },
    /// The destination has been reached; the cursor is idle.
    Finished,
    /// Planning was refused because an endpoint lies outside the grid.
    Stalled,
}

/// Result of a single control step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// State after the step.
    pub state: StepState,
    /// Whether the agent moved during this step.
    pub moved: bool,
    /// Action performed.
    pub action: StepAction,
}

/// Consumes planned paths one cell per tick.
#[derive(Clone, Debug, Default)]
pub struct PathCursor {
    held: VecDeque<CellCoord>,
    anchor: Option<CellCoord>,
    finished: bool,
}

impl PathCursor {
    /// Creates a cursor without a held path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells still to be walked, nearest first.
    pub fn remaining(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.held.iter().copied()
    }

    /// Reports whether a path is currently held.
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.held.is_empty()
    }

    /// Reports whether the agent has arrived on the destination.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drops the held path so the next step replans.
    pub fn discard(&mut self) {
        self.held.clear();
        self.anchor = None;
    }

    /// Forgets the held path and the finished flag.
    pub fn restart(&mut self) {
        self.discard();
        self.finished = false;
    }

    /// Runs one control step against the grid and goals.
    pub fn step(&mut self, grid: &GridWorld, goals: &Goals, state: StepState) -> StepOutcome {
        let idle = |action| StepOutcome {
            state,
            moved: false,
            action,
        };

        if self.finished || state.agent.cell == goals.destination {
            self.finished = true;
            self.discard();
            return idle(StepAction::Finished);
        }

        let blockers = Blockers::new(grid)
            .with_adversary(state.adversary.cell)
            .with_capability(state.agent.has_capability);
        let goal = goals.cell_for(state.objective);
        if !self.holds_valid_path(&blockers, state.agent.cell, goal) {
            if self.has_path() {
                tracing::debug!(agent = ?state.agent.cell, "held path invalidated");
            }
            self.discard();
        }

        if self.held.is_empty() {
            return self.replan(grid, &blockers, state, goal);
        }

        let Some(to) = self.held.pop_front() else {
            return idle(StepAction::Stalled);
        };
        let from = state.agent.cell;
        let mut next = state;
        next.agent.cell = to;
        next.adversary.cell = adversary::next_cell(state.adversary.cell, grid.rows());
        self.anchor = Some(to);

        if to == goals.power_up && !next.agent.has_capability {
            next.agent.has_capability = true;
            let mut selector = ObjectiveSelector::with_objective(next.objective);
            next.objective = selector.on_capability_acquired();
        }

        if next.agent.cell == next.adversary.cell || self.held.contains(&next.adversary.cell) {
            tracing::debug!(
                agent = ?next.agent.cell,
                adversary = ?next.adversary.cell,
                "adversary crossed the held path"
            );
            self.discard();
        }

        if to == goals.destination {
            tracing::debug!(cell = ?to, "destination reached");
            self.finished = true;
            self.discard();
        }

        StepOutcome {
            state: next,
            moved: true,
            action: StepAction::Moved { from, to },
        }
    }

    /// Consumes world events and the current session to emit step commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: &GridWorld,
        session: &SessionSnapshot,
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => ticked = true,
                Event::SessionReset | Event::GridConfigured { .. } => self.restart(),
                Event::MarkerPlaced { marker, .. } => match marker {
                    Marker::Agent | Marker::Destination => self.restart(),
                    Marker::Adversary | Marker::PowerUp => self.discard(),
                },
                Event::BarrierPlaced { .. } | Event::BarrierRemoved { .. } => self.discard(),
                _ => {}
            }
        }

        if !ticked {
            return;
        }

        let state = StepState::from(session);
        let outcome = self.step(grid, &session.goals, state);

        if outcome.moved {
            out.push(Command::StepAgent {
                to: outcome.state.agent.cell,
            });
            if outcome.state.adversary.cell != state.adversary.cell {
                out.push(Command::StepAdversary {
                    to: outcome.state.adversary.cell,
                });
            }
        }
        if outcome.state.objective != state.objective {
            out.push(Command::SetObjective {
                objective: outcome.state.objective,
            });
        }
    }

    fn holds_valid_path(&self, blockers: &Blockers<'_>, agent: CellCoord, goal: CellCoord) -> bool {
        if self.anchor != Some(agent) || self.held.back() != Some(&goal) {
            return false;
        }
        !self.held.iter().any(|&cell| blockers.is_blocked(cell))
    }

    fn replan(
        &mut self,
        grid: &GridWorld,
        blockers: &Blockers<'_>,
        state: StepState,
        goal: CellCoord,
    ) -> StepOutcome {
        let mut next = state;
        let mut selector = ObjectiveSelector::with_objective(state.objective);

        let action = match plan(grid, state.agent.cell, goal, |cell| blockers.is_blocked(cell)) {
            Ok(SearchResult::Found(path)) if path.step_count() > 0 => {
                let steps = path.step_count();
                tracing::debug!(
                    from = ?state.agent.cell,
                    ?goal,
                    steps,
                    cost = path.cost(),
                    "planned"
                );
                self.held = path.into_cells().into_iter().skip(1).collect();
                self.anchor = Some(state.agent.cell);
                StepAction::Planned { goal, steps }
            }
            Ok(SearchResult::Found(_)) => {
                // Standing on a goal that yields nothing; pursue the other one.
                next.objective = selector.on_unreachable();
                StepAction::Unreachable { goal }
            }
            Ok(SearchResult::Unreachable) => {
                next.objective = selector.on_unreachable();
                StepAction::Unreachable { goal }
            }
            Err(error) => {
                tracing::warn!(%error, "planning refused");
                StepAction::Stalled
            }
        };

        StepOutcome {
            state: next,
            moved: false,
            action,
        }
    }
}
