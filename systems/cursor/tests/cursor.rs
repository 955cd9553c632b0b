use pathrunner_core::{
    AdversaryState, AgentState, CellCoord, Command, Event, Goals, Layout, Objective,
};
use pathrunner_system_cursor::{PathCursor, StepAction, StepOutcome, StepState};
use pathrunner_world::{self as world, query, GridWorld, World};

fn ring_around(center: CellCoord) -> Vec<CellCoord> {
    let mut ring = Vec::new();
    for dc in -1..=1 {
        for dr in -1..=1 {
            if (dc, dr) != (0, 0) {
                ring.push(center.offset(dc, dr).expect("ring inside grid"));
            }
        }
    }
    ring
}

fn run_until_finished(
    cursor: &mut PathCursor,
    grid: &GridWorld,
    goals: &Goals,
    mut state: StepState,
    limit: usize,
) -> Vec<StepOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..limit {
        let outcome = cursor.step(grid, goals, state);
        state = outcome.state;
        outcomes.push(outcome);
        if outcome.action == StepAction::Finished {
            break;
        }
    }
    outcomes
}

#[test]
fn walled_destination_falls_back_to_power_up_then_breaks_through() {
    let destination = CellCoord::new(5, 5);
    let ring = ring_around(destination);
    let grid = GridWorld::with_barriers(7, 7, ring.iter().copied()).expect("grid");
    let goals = Goals {
        destination,
        power_up: CellCoord::new(1, 5),
    };
    let start = StepState {
        agent: AgentState::at(CellCoord::new(1, 1)),
        adversary: AdversaryState::at(CellCoord::new(6, 1)),
        objective: Objective::Primary,
    };
    let mut cursor = PathCursor::new();

    let outcomes = run_until_finished(&mut cursor, &grid, &goals, start, 40);

    assert_eq!(outcomes[0].action, StepAction::Unreachable { goal: destination });
    assert_eq!(outcomes[0].state.objective, Objective::Secondary);
    assert!(!outcomes[0].moved);
    assert_eq!(
        outcomes[1].action,
        StepAction::Planned {
            goal: CellCoord::new(1, 5),
            steps: 4,
        }
    );

    let acquired_at = outcomes
        .iter()
        .position(|outcome| outcome.state.agent.has_capability)
        .expect("power-up collected");
    assert_eq!(outcomes[acquired_at].state.agent.cell, CellCoord::new(1, 5));
    assert_eq!(outcomes[acquired_at].state.objective, Objective::Primary);
    assert!(
        outcomes[acquired_at..]
            .iter()
            .all(|outcome| outcome.state.agent.has_capability),
        "capability must never be lost"
    );

    let last = outcomes.last().expect("outcomes recorded");
    assert_eq!(last.action, StepAction::Finished);
    assert_eq!(last.state.agent.cell, destination);
    assert!(
        outcomes
            .iter()
            .any(|outcome| ring.contains(&outcome.state.agent.cell)),
        "agent should pass through the former barrier ring"
    );
}

#[test]
fn adversary_crossing_the_path_forces_a_replan() {
    let grid = GridWorld::new(7, 3).expect("grid");
    let goals = Goals {
        destination: CellCoord::new(6, 1),
        power_up: CellCoord::new(0, 0),
    };
    let start = StepState {
        agent: AgentState::at(CellCoord::new(0, 1)),
        adversary: AdversaryState::at(CellCoord::new(3, 2)),
        objective: Objective::Primary,
    };
    let mut cursor = PathCursor::new();

    let planned = cursor.step(&grid, &goals, start);
    assert!(matches!(planned.action, StepAction::Planned { steps: 6, .. }));
    assert!(cursor.remaining().any(|cell| cell == CellCoord::new(3, 1)));

    let walked = cursor.step(&grid, &goals, planned.state);
    assert!(walked.moved);
    assert_eq!(walked.state.agent.cell, CellCoord::new(1, 1));
    assert_eq!(walked.state.adversary.cell, CellCoord::new(3, 1));
    assert!(!cursor.has_path(), "path through the adversary must be dropped");

    let replanned = cursor.step(&grid, &goals, walked.state);
    assert!(!replanned.moved);
    assert!(matches!(replanned.action, StepAction::Planned { .. }));
    assert!(cursor.remaining().all(|cell| cell != CellCoord::new(3, 1)));

    let mut state = replanned.state;
    for _ in 0..30 {
        let outcome = cursor.step(&grid, &goals, state);
        if outcome.moved {
            assert_ne!(
                outcome.state.agent.cell, state.adversary.cell,
                "agent stepped onto the adversary's cell"
            );
        }
        state = outcome.state;
        if outcome.action == StepAction::Finished {
            break;
        }
    }
    assert_eq!(state.agent.cell, goals.destination);
    assert!(cursor.is_finished());
}

#[test]
fn unreachable_goals_keep_alternating_without_moving() {
    let agent = CellCoord::new(0, 0);
    let pocket = ring_around(CellCoord::new(1, 1))
        .into_iter()
        .filter(|&cell| cell != agent)
        .chain([CellCoord::new(1, 1)]);
    let grid = GridWorld::with_barriers(5, 5, pocket).expect("grid");
    let goals = Goals {
        destination: CellCoord::new(4, 4),
        power_up: CellCoord::new(4, 0),
    };
    let mut state = StepState {
        agent: AgentState::at(agent),
        adversary: AdversaryState::at(CellCoord::new(3, 3)),
        objective: Objective::Primary,
    };
    let mut cursor = PathCursor::new();

    let mut objectives = Vec::new();
    for _ in 0..4 {
        let outcome = cursor.step(&grid, &goals, state);
        assert!(!outcome.moved);
        state = outcome.state;
        objectives.push(state.objective);
    }

    assert_eq!(
        objectives,
        vec![
            Objective::Secondary,
            Objective::Primary,
            Objective::Secondary,
            Objective::Primary
        ]
    );
}

fn corridor_layout() -> Layout {
    Layout {
        columns: 6,
        rows: 5,
        agent: CellCoord::new(0, 1),
        adversary: CellCoord::new(0, 4),
        destination: CellCoord::new(5, 1),
        power_up: CellCoord::new(5, 4),
        barriers: Vec::new(),
    }
}

fn pump(world: &mut World, cursor: &mut PathCursor, command: Command, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        cursor.handle(
            &events,
            query::grid(world),
            &query::session(world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

#[test]
fn barrier_placed_on_path_triggers_replan() {
    let mut world = World::new(&corridor_layout()).expect("valid layout");
    let mut cursor = PathCursor::new();
    let mut log = Vec::new();

    pump(&mut world, &mut cursor, Command::Tick, &mut log);
    pump(&mut world, &mut cursor, Command::Tick, &mut log);
    assert_eq!(query::session(&world).agent.cell, CellCoord::new(1, 1));
    assert!(cursor.remaining().any(|cell| cell == CellCoord::new(3, 1)));

    let barrier = CellCoord::new(3, 1);
    pump(
        &mut world,
        &mut cursor,
        Command::PlaceBarrier { cell: barrier },
        &mut log,
    );
    assert!(!cursor.has_path());

    for _ in 0..20 {
        pump(&mut world, &mut cursor, Command::Tick, &mut log);
        if cursor.is_finished() {
            break;
        }
    }

    assert!(log.contains(&Event::DestinationReached {
        cell: CellCoord::new(5, 1)
    }));
    assert!(!log.iter().any(|event| matches!(
        event,
        Event::AgentAdvanced { to, .. } if *to == barrier
    )));
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::StepRejected { .. })));
}

#[test]
fn reset_restarts_a_finished_cursor() {
    let mut world = World::new(&corridor_layout()).expect("valid layout");
    let mut cursor = PathCursor::new();
    let mut log = Vec::new();

    for _ in 0..10 {
        pump(&mut world, &mut cursor, Command::Tick, &mut log);
    }
    assert!(cursor.is_finished());

    pump(&mut world, &mut cursor, Command::Reset, &mut log);
    assert!(!cursor.is_finished());
    assert_eq!(query::session(&world).agent.cell, CellCoord::new(0, 1));

    pump(&mut world, &mut cursor, Command::Tick, &mut log);
    assert!(cursor.has_path());
}
