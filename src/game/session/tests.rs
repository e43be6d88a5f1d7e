use super::*;
use crate::game::snake::Placement;
use crate::game::scene::{Parent, Pivot};
use crate::game::spawn::Spawn;
use crate::game::types::{CellMark, Occupancy};
use rand::SeedableRng;
use std::collections::HashSet;
use std::f64::consts::FRAC_PI_2;

fn quiet_config() -> GameConfig {
    GameConfig {
        initial_snakes: 0,
        ..GameConfig::default()
    }
}

fn make_session(config: GameConfig, seed: u64) -> GameSession<StdRng> {
    GameSession::new(config, StdRng::seed_from_u64(seed), 0.0)
}

/// Park the player where nothing interesting happens.
fn park_player(session: &mut GameSession<StdRng>, cell: Cell) {
    session.player.cell = cell;
    session.player.target = None;
    session.player.stunned_until = f64::INFINITY;
}

fn assert_grid_consistent(session: &GameSession<StdRng>) {
    let mut surface = HashSet::new();
    for snake in &session.snakes {
        for segment in snake.segments().filter(|segment| segment.cell().is_some() && !segment.burrowing && !segment.to_destroy) {
            let cell = segment.cell().expect("surface segment has a cell");
            assert!(surface.insert(cell), "two segments on {cell:?}");
        }
    }
    for (cell, _) in session.field.occupied_cells() {
        let owned = session.snakes.iter().any(|snake| {
            snake
                .segments()
                .any(|segment| !segment.to_destroy && segment.cell() == Some(cell))
        });
        assert!(owned, "occupied cell {cell:?} has no live segment");
    }
}

/// Cells reserved by `snake`, walked from its spawn cell to its frontier.
fn planned_path(field: &GridField, snake: &SnakeBody) -> Vec<Cell> {
    let mut path = vec![snake.segment(snake.head_index()).spawn_position];
    while let Some(&cell) = path.last() {
        if cell == snake.frontier || path.len() > field.width() * field.height() {
            break;
        }
        let Some(heading) = field.mark(cell).heading() else { break };
        let Some(next) = field.neighbor(cell, heading) else { break };
        path.push(next);
    }
    path
}

fn assert_horizon_full(session: &GameSession<StdRng>) {
    let prediction = session.config.snake_prediction;
    for snake in &session.snakes {
        if !snake.burrow_planned {
            assert_eq!(snake.planned_depth, prediction, "snake {}", snake.id);
        }
    }
}

#[test]
fn new_session_spawns_initial_snakes_with_a_full_plan() {
    let session = make_session(GameConfig::default(), 1);

    assert_eq!(session.snakes.len(), 1);
    assert_eq!(session.status, SessionStatus::Running);
    assert_horizon_full(&session);
    let snake = &session.snakes[0];
    assert_eq!(snake.length, session.config.snake_length);
    let reserved = session.field.marked_cells().count();
    assert_eq!(reserved, snake.planned_depth + 1);
    assert_eq!(session.field.occupied_cells().count(), 0);
}

#[test]
fn long_run_keeps_the_grid_consistent_and_the_horizon_full() {
    let config = GameConfig {
        max_snakes: 4,
        level_up_ms: 5_000.0,
        base_delay_ms: 200.0,
        ..GameConfig::default()
    };
    let mut session = make_session(config, 42);
    park_player(&mut session, Cell::new(0, 0));

    let mut now = 0.0;
    for _ in 0..3_000 {
        now += 16.0;
        session.tick(now);
        assert_grid_consistent(&session);
        if session.status == SessionStatus::Running {
            assert_horizon_full(&session);
        }
    }
    assert!(session.snakes.len() + session.pending_spawns.len() <= 4);
}

#[test]
fn burrowed_snake_is_replaced_with_one_of_equal_length() {
    let mut session = make_session(quiet_config(), 5);
    park_player(&mut session, Cell::new(0, 0));

    let origin = Cell::new(10, 5);
    let burrow = Cell::new(10, 7);
    session.field.set_mark(origin, CellMark::Heading(Direction::Right));
    session.field.set_mark(Cell::new(10, 6), CellMark::Heading(Direction::Right));
    session.field.set_mark(burrow, CellMark::Burrow);
    let spawn = Spawn {
        origin,
        neighbor: Cell::new(10, 6),
        direction: Direction::Right,
    };
    let mut snake = SnakeBody::new(99, &spawn, 2, 0.0, session.current_delay());
    snake.frontier = burrow;
    snake.planned_depth = 2;
    snake.burrow_planned = true;
    session.snakes.push(snake);

    let mut now = 0.0;
    while now < 5_900.0 {
        now += 100.0;
        session.tick(now);
        assert_eq!(session.snakes[0].id, 99);
        assert_grid_consistent(&session);
    }
    assert_eq!(session.field.occupancy(burrow), Occupancy::SnakeBody);

    session.tick(6_000.0);

    assert_eq!(session.snakes.len(), 1);
    let replacement = &session.snakes[0];
    assert_ne!(replacement.id, 99);
    assert_eq!(replacement.length, 2);
    assert!(matches!(
        replacement.segment(replacement.head_index()).placement,
        Placement::Underground { .. }
    ));
    assert_eq!(session.field.occupied_cells().count(), 0);
    assert_eq!(
        session.field.marked_cells().count(),
        replacement.planned_depth + 1
    );

    let path = planned_path(&session.field, replacement);
    assert_eq!(path.len(), replacement.planned_depth + 1);
    assert_eq!(path.last(), Some(&replacement.frontier));
    let reserved: HashSet<Cell> = session.field.marked_cells().map(|(cell, _)| cell).collect();
    assert_eq!(reserved, path.iter().copied().collect::<HashSet<_>>());
    for cell in [origin, Cell::new(10, 6), burrow] {
        assert_eq!(session.field.occupancy(cell), Occupancy::Free);
        if !path.contains(&cell) {
            assert!(session.field.mark(cell).is_empty(), "{cell:?} still reserved");
        }
    }
}

#[test]
fn head_on_the_player_ends_the_game_at_the_next_boundary() {
    let mut session = make_session(quiet_config(), 3);
    let cell = session.player.cell;
    session.field.set_occupancy(cell, Occupancy::LethalHead);

    assert_eq!(session.tick(100.0), SessionStatus::Running);
    assert_eq!(session.tick(250.0), SessionStatus::GameOver);

    let frozen = session.score(250.0);
    assert_eq!(session.tick(5_000.0), SessionStatus::GameOver);
    assert_eq!(session.score(5_000.0), frozen);

    session.handle_input(Direction::Left);
    assert_eq!(session.player.queued, None);
}

#[test]
fn restart_returns_to_the_initial_state() {
    let config = GameConfig {
        level_up_ms: 1_000.0,
        ..GameConfig::default()
    };
    let mut session = make_session(config, 8);
    park_player(&mut session, Cell::new(0, 0));
    session.tick(3_500.0);
    assert_eq!(session.level(), 3);

    session.restart(10_000.0);

    assert_eq!(session.level(), 0);
    assert_eq!(session.status, SessionStatus::Running);
    assert_eq!(session.snakes.len(), 1);
    assert_eq!(session.score(10_000.0), 0.0);
    assert_eq!(session.player.cell, Cell::new(10, 10));
    assert_eq!(
        session.field.marked_cells().count(),
        session.snakes[0].planned_depth + 1
    );
}

#[test]
fn level_ups_speed_snakes_up_and_respect_the_cap() {
    // Snakes never reach the surface, so the player cannot be caught.
    let config = GameConfig {
        level_up_ms: 1_000.0,
        max_snakes: 2,
        base_delay_ms: 1.0e9,
        ..GameConfig::default()
    };
    let mut session = make_session(config, 21);
    park_player(&mut session, Cell::new(0, 0));
    let base = session.current_delay();

    let mut now = 0.0;
    while now < 10_000.0 {
        now += 100.0;
        session.tick(now);
        assert!(session.snakes.len() + session.pending_spawns.len() <= 2);
    }

    assert_eq!(session.level(), 10);
    assert!(session.current_delay() < base);
}

#[test]
fn level_up_at_capacity_spawns_nothing() {
    let config = GameConfig {
        max_snakes: 1,
        ..GameConfig::default()
    };
    let mut session = make_session(config, 2);
    for _ in 0..20 {
        assert_eq!(session.level_up_spawns(), 0);
    }
    assert!(session.pending_spawns.is_empty());
}

#[test]
fn starved_spawn_stays_pending() {
    let config = GameConfig {
        field_width: 4,
        field_height: 4,
        max_spawn_attempts: 50,
        initial_snakes: 0,
        ..GameConfig::default()
    };
    let mut session = make_session(config, 9);
    for cell in session.field.cells().collect::<Vec<_>>() {
        session.field.set_mark(cell, CellMark::Burrow);
    }

    session.pending_spawns.push(3);
    session.flush_pending_spawns(0.0);

    assert!(session.snakes.is_empty());
    assert_eq!(session.pending_spawns, vec![3]);

    session.field.reset();
    session.flush_pending_spawns(SPAWN_RETRY_MS / 2.0);
    assert!(session.snakes.is_empty(), "retried before the back-off ran out");

    session.flush_pending_spawns(SPAWN_RETRY_MS);
    assert_eq!(session.snakes.len(), 1);
    assert_eq!(session.snakes[0].length, 3);
    assert!(session.pending_spawns.is_empty());
}

#[test]
fn finished_snake_cancels_the_spawn_back_off() {
    let mut session = make_session(quiet_config(), 12);
    session.spawn_retry_at = Some(1.0e9);
    session.pending_spawns.push(4);
    session.flush_pending_spawns(10.0);
    assert!(session.snakes.is_empty());

    let spawn = reserve(&mut session.field, &mut session.rng, 100).expect("empty board");
    let mut finished = SnakeBody::new(50, &spawn, 1, 0.0, 100.0);
    finished.segment_mut(0).to_destroy = true;
    session.snakes.push(finished);

    session.replace_finished();
    session.flush_pending_spawns(20.0);

    let lengths: Vec<_> = session.snakes.iter().map(|snake| snake.length).collect();
    assert_eq!(lengths.len(), 2);
    assert!(lengths.contains(&4) && lengths.contains(&1));
    assert!(session.pending_spawns.is_empty());
}

#[test]
fn snapshot_carries_hud_and_segment_states() {
    let mut session = make_session(GameConfig::default(), 4);
    session.tick(16.0);

    let snapshot = session.snapshot(16.0);
    assert_eq!(snapshot.level, 0);
    assert!(snapshot.hud.contains("Level: 0"));
    assert_eq!(snapshot.snakes.len(), 1);
    assert!(snapshot.snakes[0]
        .segments
        .iter()
        .all(|segment| segment.state == "surfacing"));

    let value = serde_json::to_value(&snapshot).expect("snapshot serializes");
    assert_eq!(value["status"], "running");
    assert!(value["player"]["node"]["position"]["x"].is_number());
    assert!(value["snakes"][0]["segments"][0]["world"]["z"].is_number());
}

#[test]
fn snapshot_reports_pivoted_segments_in_world_space() {
    let mut session = make_session(GameConfig::default(), 4);
    let head = session.snakes[0].head_index();
    let node = &mut session.snakes[0].segment_mut(head).node;
    node.set_position(Vec3::new(-0.5, 0.0, 0.0));
    node.reparent(Parent::Pivot(Pivot {
        origin: Vec3::new(3.0, 4.0, 0.0),
        sweep: FRAC_PI_2,
    }));

    let snapshot = session.snapshot(0.0);

    let segment = &snapshot.snakes[0].segments[0];
    assert!((segment.world.x - 3.0).abs() < 1e-9);
    assert!((segment.world.y - 4.5).abs() < 1e-9);
    assert!((segment.heading - FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn input_is_queued_for_the_player() {
    let mut session = make_session(quiet_config(), 6);
    session.handle_input(Direction::Right);
    assert_eq!(session.player.queued, Some(Direction::Right));
    session.tick(250.0);
    assert_eq!(session.player.direction, Direction::Right);
}
