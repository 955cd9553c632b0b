use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use pathrunner_core::CellCoord;
use pathrunner_system_planner::{
    metric::{step_cost, DIAGONAL_STEP_COST},
    plan, Path, PlanError, Search, SearchResult,
};
use pathrunner_world::{Blockers, GridWorld};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

fn expect_path(result: Result<SearchResult, PlanError>) -> Path {
    result
        .expect("endpoints in bounds")
        .into_path()
        .expect("goal reachable")
}

fn assert_walkable(grid: &GridWorld, path: &Path, blocked: impl Fn(CellCoord) -> bool) {
    let cells = path.cells();
    for pair in cells.windows(2) {
        assert!(
            pair[0].is_adjacent(pair[1]),
            "{:?} -> {:?} is not a single step",
            pair[0],
            pair[1]
        );
    }
    for &cell in &cells[1..] {
        assert!(grid.in_bounds(cell), "{cell:?} left the grid");
        assert!(!blocked(cell), "{cell:?} is blocked");
    }
    let walked: u32 = cells.windows(2).map(|pair| step_cost(pair[0], pair[1])).sum();
    assert_eq!(walked, path.cost(), "reported cost differs from walked cost");
}

#[test]
fn open_grid_walks_the_diagonal() {
    let grid = GridWorld::new(5, 5).expect("grid");

    let path = expect_path(plan(
        &grid,
        CellCoord::new(0, 0),
        CellCoord::new(4, 4),
        |_| false,
    ));

    let expected: Vec<_> = (0..5).map(|index| CellCoord::new(index, index)).collect();
    assert_eq!(path.cells(), expected.as_slice());
    assert_eq!(path.cost(), 4 * DIAGONAL_STEP_COST);
}

#[test]
fn wall_is_crossed_through_its_only_gap() {
    let gap = CellCoord::new(3, 2);
    let wall = (0..7)
        .map(|column| CellCoord::new(column, 2))
        .filter(|&cell| cell != gap);
    let grid = GridWorld::with_barriers(7, 5, wall).expect("grid");
    let blockers = Blockers::new(&grid);

    let path = expect_path(plan(
        &grid,
        CellCoord::new(0, 0),
        CellCoord::new(6, 4),
        |cell| blockers.is_blocked(cell),
    ));

    assert!(path.cells().contains(&gap), "path {:?} skipped the gap", path.cells());
    assert_walkable(&grid, &path, |cell| blockers.is_blocked(cell));
}

#[test]
fn enclosed_goal_is_unreachable() {
    let ring = [
        CellCoord::new(4, 4),
        CellCoord::new(5, 4),
        CellCoord::new(6, 4),
        CellCoord::new(4, 5),
        CellCoord::new(6, 5),
        CellCoord::new(4, 6),
        CellCoord::new(5, 6),
        CellCoord::new(6, 6),
    ];
    let grid = GridWorld::with_barriers(8, 8, ring).expect("grid");
    let blockers = Blockers::new(&grid);

    let result = plan(&grid, CellCoord::new(0, 0), CellCoord::new(5, 5), |cell| {
        blockers.is_blocked(cell)
    })
    .expect("endpoints in bounds");

    assert_eq!(result, SearchResult::Unreachable);
}

#[test]
fn capability_opens_a_route_through_barriers() {
    let wall = (0..6).map(|column| CellCoord::new(column, 3));
    let grid = GridWorld::with_barriers(6, 6, wall).expect("grid");
    let start = CellCoord::new(2, 0);
    let goal = CellCoord::new(2, 5);

    let blocked = Blockers::new(&grid);
    let without = plan(&grid, start, goal, |cell| blocked.is_blocked(cell)).expect("in bounds");
    assert!(without.is_unreachable());

    let unlocked = Blockers::new(&grid).with_capability(true);
    let path = expect_path(plan(&grid, start, goal, |cell| unlocked.is_blocked(cell)));
    assert_eq!(path.step_count(), 5);
    assert!(path.cells().contains(&CellCoord::new(2, 3)));
}

#[test]
fn adversary_cell_is_routed_around() {
    let grid = GridWorld::new(5, 3).expect("grid");
    let blockers = Blockers::new(&grid).with_adversary(CellCoord::new(2, 1));

    let path = expect_path(plan(
        &grid,
        CellCoord::new(0, 1),
        CellCoord::new(4, 1),
        |cell| blockers.is_blocked(cell),
    ));

    assert!(!path.cells().contains(&CellCoord::new(2, 1)));
    assert_walkable(&grid, &path, |cell| blockers.is_blocked(cell));
}

#[test]
fn repeated_calls_return_identical_paths() {
    let barriers = [
        CellCoord::new(2, 0),
        CellCoord::new(2, 1),
        CellCoord::new(2, 2),
        CellCoord::new(5, 4),
        CellCoord::new(5, 5),
        CellCoord::new(5, 6),
    ];
    let grid = GridWorld::with_barriers(8, 8, barriers).expect("grid");
    let blockers = Blockers::new(&grid);
    let run = || {
        plan(&grid, CellCoord::new(0, 0), CellCoord::new(7, 7), |cell| {
            blockers.is_blocked(cell)
        })
    };

    let first = run();
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

#[test]
fn empty_grid_step_count_matches_chebyshev_distance() {
    let grid = GridWorld::new(9, 7).expect("grid");
    let start = CellCoord::new(1, 5);

    for column in 0..9 {
        for row in 0..7 {
            let goal = CellCoord::new(column, row);
            let path = expect_path(plan(&grid, start, goal, |_| false));
            assert_eq!(
                path.step_count(),
                start.chebyshev_distance(goal) as usize,
                "unexpected step count towards {goal:?}"
            );
        }
    }
}

#[test]
fn out_of_bounds_goal_is_a_contract_violation() {
    let grid = GridWorld::new(4, 4).expect("grid");

    let error = plan(&grid, CellCoord::new(0, 0), CellCoord::new(4, 0), |_| false)
        .expect_err("goal outside grid");

    assert_eq!(
        error,
        PlanError::GoalOutOfBounds {
            cell: CellCoord::new(4, 0),
            columns: 4,
            rows: 4,
        }
    );
}

#[test]
fn sliced_search_matches_single_call() {
    let barriers = (1..9).map(|row| CellCoord::new(4, row));
    let grid = GridWorld::with_barriers(10, 10, barriers).expect("grid");
    let blockers = Blockers::new(&grid);
    let start = CellCoord::new(0, 9);
    let goal = CellCoord::new(9, 9);

    let expected = plan(&grid, start, goal, |cell| blockers.is_blocked(cell)).expect("in bounds");

    let mut search =
        Search::new(&grid, start, goal, |cell| blockers.is_blocked(cell)).expect("in bounds");
    let mut slices = 0;
    let result = loop {
        slices += 1;
        if let Some(result) = search.advance(3) {
            break result;
        }
    };

    assert!(slices > 1, "budget should force several slices");
    assert_eq!(result, expected);
    assert!(search.stats().expanded > 0);
    assert!(search.stats().pushed >= search.stats().expanded);
}

#[test]
fn random_grids_match_reference_dijkstra() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_a57a);

    for _ in 0..40 {
        let columns = rng.gen_range(3..12);
        let rows = rng.gen_range(3..12);
        let start = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        let goal = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));

        let mut barriers = BTreeSet::new();
        for column in 0..columns {
            for row in 0..rows {
                let cell = CellCoord::new(column, row);
                if cell != start && cell != goal && rng.gen_bool(0.3) {
                    let _ = barriers.insert(cell);
                }
            }
        }
        let grid = GridWorld::with_barriers(columns, rows, barriers).expect("grid");
        let blockers = Blockers::new(&grid);
        let blocked = |cell: CellCoord| blockers.is_blocked(cell);

        let result = plan(&grid, start, goal, blocked).expect("in bounds");
        let reference = dijkstra(&grid, start, goal, blocked);

        match (result, reference) {
            (SearchResult::Found(path), Some(cost)) => {
                assert_eq!(path.start(), start);
                assert_eq!(path.goal(), goal);
                assert_eq!(path.cost(), cost, "A* cost differs from optimum");
                assert_walkable(&grid, &path, blocked);
            }
            (SearchResult::Unreachable, None) => {}
            (result, reference) => {
                panic!("planner returned {result:?} but reference cost is {reference:?}")
            }
        }
    }
}

fn dijkstra(
    grid: &GridWorld,
    start: CellCoord,
    goal: CellCoord,
    blocked: impl Fn(CellCoord) -> bool,
) -> Option<u32> {
    let mut best = HashMap::from([(start, 0)]);
    let mut queue = BinaryHeap::from([Reverse((0, start))]);

    while let Some(Reverse((cost, cell))) = queue.pop() {
        if cell == goal {
            return Some(cost);
        }
        if best.get(&cell).is_some_and(|&known| known < cost) {
            continue;
        }
        for next in grid.neighbors(cell) {
            if blocked(next) {
                continue;
            }
            let candidate = cost + step_cost(cell, next);
            if best.get(&next).map_or(true, |&known| candidate < known) {
                let _ = best.insert(next, candidate);
                queue.push(Reverse((candidate, next)));
            }
        }
    }

    None
}
