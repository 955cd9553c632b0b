//! Resumable A* search owning its own frontier and cost tables.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
};

use pathrunner_core::CellCoord;
use pathrunner_world::GridWorld;

use crate::{
    metric::{octile_distance, step_cost},
    Path, PlanError, SearchResult,
};

/// Frontier entry ordered by f-cost, ties broken by the lower cell.
///
/// `BinaryHeap` is a max-heap, so the comparison is reversed to pop the
/// lowest `(f_cost, cell)` pair first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    f_cost: u32,
    cell: CellCoord,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Node counts gathered while a search runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the frontier and closed.
    pub expanded: usize,
    /// Entries pushed onto the frontier, including duplicates.
    pub pushed: usize,
}

/// A* search between two cells that can be advanced in slices.
///
/// The search borrows the grid for its whole lifetime, so the grid stays
/// read-only until the search is dropped. Advancing in several slices
/// yields exactly the result of a single uninterrupted run.
pub struct Search<'a, F> {
    grid: &'a GridWorld,
    is_blocked: F,
    start: CellCoord,
    goal: CellCoord,
    frontier: BinaryHeap<FrontierEntry>,
    g_costs: HashMap<CellCoord, u32>,
    predecessors: HashMap<CellCoord, CellCoord>,
    closed: HashSet<CellCoord>,
    stats: SearchStats,
    result: Option<SearchResult>,
}

impl<'a, F> Search<'a, F>
where
    F: Fn(CellCoord) -> bool,
{
    /// Prepares a search from `start` to `goal`.
    ///
    /// Fails when either endpoint lies outside the grid.
    pub fn new(
        grid: &'a GridWorld,
        start: CellCoord,
        goal: CellCoord,
        is_blocked: F,
    ) -> Result<Self, PlanError> {
        if !grid.in_bounds(start) {
            return Err(PlanError::StartOutOfBounds {
                cell: start,
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }
        if !grid.in_bounds(goal) {
            return Err(PlanError::GoalOutOfBounds {
                cell: goal,
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }

        let mut search = Self {
            grid,
            is_blocked,
            start,
            goal,
            frontier: BinaryHeap::new(),
            g_costs: HashMap::new(),
            predecessors: HashMap::new(),
            closed: HashSet::new(),
            stats: SearchStats::default(),
            result: None,
        };
        let _ = search.g_costs.insert(start, 0);
        search.push(start, octile_distance(start, goal));
        Ok(search)
    }

    /// Statistics gathered so far.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs the search to completion.
    pub fn run(self) -> SearchResult {
        self.run_with_stats().0
    }

    /// Runs the search to completion and reports how much work it took.
    pub fn run_with_stats(mut self) -> (SearchResult, SearchStats) {
        loop {
            if let Some(result) = self.advance(usize::MAX) {
                return (result, self.stats);
            }
        }
    }

    /// Expands at most `max_expansions` nodes.
    ///
    /// Returns `None` while the search is still in progress. Once finished,
    /// every further call returns the same result.
    pub fn advance(&mut self, max_expansions: usize) -> Option<SearchResult> {
        if let Some(result) = &self.result {
            return Some(result.clone());
        }

        let mut expanded = 0;
        while expanded < max_expansions {
            let Some(FrontierEntry { cell: current, .. }) = self.frontier.pop() else {
                tracing::trace!(
                    expanded = self.stats.expanded,
                    pushed = self.stats.pushed,
                    "frontier exhausted"
                );
                return Some(self.finish(SearchResult::Unreachable));
            };

            if self.closed.contains(&current) {
                continue;
            }

            if current == self.goal {
                let path = self.reconstruct();
                tracing::trace!(
                    expanded = self.stats.expanded,
                    pushed = self.stats.pushed,
                    cost = path.cost(),
                    "path found"
                );
                return Some(self.finish(SearchResult::Found(path)));
            }

            let _ = self.closed.insert(current);
            self.stats.expanded += 1;
            expanded += 1;
            self.expand(current);
        }

        None
    }

    fn expand(&mut self, current: CellCoord) {
        let current_g = self.g_costs.get(&current).copied().unwrap_or(u32::MAX);
        let grid = self.grid;

        for neighbor in grid.neighbors(current) {
            if self.closed.contains(&neighbor) || (self.is_blocked)(neighbor) {
                continue;
            }

            let tentative_g = current_g.saturating_add(step_cost(current, neighbor));
            let known_g = self.g_costs.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g >= known_g {
                continue;
            }

            let _ = self.g_costs.insert(neighbor, tentative_g);
            let _ = self.predecessors.insert(neighbor, current);
            self.push(
                neighbor,
                tentative_g.saturating_add(octile_distance(neighbor, self.goal)),
            );
        }
    }

    fn push(&mut self, cell: CellCoord, f_cost: u32) {
        self.frontier.push(FrontierEntry { f_cost, cell });
        self.stats.pushed += 1;
    }

    fn reconstruct(&self) -> Path {
        let mut cells = vec![self.goal];
        let mut current = self.goal;
        while current != self.start {
            let Some(&previous) = self.predecessors.get(&current) else {
                break;
            };
            cells.push(previous);
            current = previous;
        }
        cells.reverse();

        let cost = self.g_costs.get(&self.goal).copied().unwrap_or(0);
        Path::new(cells, cost)
    }

    fn finish(&mut self, result: SearchResult) -> SearchResult {
        self.frontier.clear();
        self.result = Some(result.clone());
        result
    }
}
