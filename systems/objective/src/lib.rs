#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-state policy choosing which goal the planner targets.

use pathrunner_core::Objective;

/// Chooses between the destination and the power-up fallback.
///
/// An unreachable goal flips the objective to the other one; acquiring the
/// capability always retargets the destination. The selector keeps
/// alternating when both goals stay unreachable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectiveSelector {
    active: Objective,
}

impl ObjectiveSelector {
    /// Creates a selector already pursuing `objective`.
    #[must_use]
    pub const fn with_objective(objective: Objective) -> Self {
        Self { active: objective }
    }

    /// Records that the active goal could not be reached and flips to the other one.
    pub fn on_unreachable(&mut self) -> Objective {
        let previous = self.active;
        self.active = previous.other();
        tracing::debug!(from = ?previous, to = ?self.active, "objective unreachable, switching");
        self.active
    }

    /// Records that the power-up was collected; the destination becomes the target.
    pub fn on_capability_acquired(&mut self) -> Objective {
        if self.active != Objective::Primary {
            tracing::debug!("capability acquired, retargeting destination");
        }
        self.active = Objective::Primary;
        self.active
    }
}
