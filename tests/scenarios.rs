use maze_chase_engine::constants::{COLS, ROWS, TICK_RATE};
use maze_chase_engine::engine::{EngineOptions, GameEngine};
use maze_chase_engine::rng::Rng;
use maze_chase_engine::types::{Direction, Mode, RuntimeEvent};
use maze_chase_engine::world::{generate_maze, tile_of, GridMap};

const MOVES: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

fn engine(seed: u32) -> GameEngine {
    GameEngine::new(EngineOptions {
        seed,
        ..EngineOptions::default()
    })
}

/// Steps `ticks` times with a seeded random steering every 10 ticks and
/// returns every drained event.
fn drive(engine: &mut GameEngine, input_seed: u32, ticks: u64) -> Vec<RuntimeEvent> {
    let mut input = Rng::new(input_seed);
    let mut events = Vec::new();
    for _ in 0..ticks {
        if engine.tick() % 10 == 0 {
            if let Some(dir) = input.pick(&MOVES) {
                engine.set_direction(dir);
            }
        }
        engine.step();
        events.extend(engine.build_snapshot(true).events);
    }
    events
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let mut first = engine(1234);
    let mut second = engine(1234);
    let first_events = drive(&mut first, 99, 4000);
    let second_events = drive(&mut second, 99, 4000);

    assert_eq!(first_events, second_events);
    let first_json = serde_json::to_string(&first.build_snapshot(false)).unwrap();
    let second_json = serde_json::to_string(&second.build_snapshot(false)).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn long_run_keeps_grid_accounting_and_player_out_of_walls() {
    let mut engine = engine(77);
    let mut input = Rng::new(5);
    for _ in 0..(TICK_RATE as u64 * 120) {
        if engine.tick() % 7 == 0 {
            if let Some(dir) = input.pick(&MOVES) {
                engine.set_direction(dir);
            }
        }
        engine.step();

        let grid = engine.grid();
        assert_eq!(
            grid.pellets_consumed() + grid.pellets_remaining(),
            grid.initial_pellets()
        );
        let pos = engine.player_position();
        assert!(!grid.is_wall(tile_of(pos.x, pos.y)), "tick {}", engine.tick());
        assert!(engine.best_score() >= engine.score());
    }
}

#[test]
fn snapshot_serializes_full_board_and_config() {
    let mut engine = GameEngine::new(EngineOptions {
        seed: 5,
        adversary_tunnel_wrap: true,
        ..EngineOptions::default()
    });
    let snapshot = engine.build_snapshot(true);
    assert_eq!(snapshot.cells.len(), ROWS as usize);
    assert!(snapshot.cells.iter().all(|row| row.chars().count() == COLS as usize));
    assert_eq!(snapshot.ghosts.len(), 4);
    assert_eq!(snapshot.mode, Mode::Scatter);

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["config"]["seed"], 5);
    assert_eq!(value["config"]["tickRate"], TICK_RATE);
    assert_eq!(value["pelletsRemaining"], snapshot.pellets_remaining);
    assert_eq!(value["ghosts"][0]["role"], "aggressive");
}

#[test]
fn custom_layout_is_restocked_each_level() {
    let rows = generate_maze(1).to_rows().join("\n");
    let layout = GridMap::parse_standard(&rows).unwrap();
    let initial = layout.initial_pellets();

    let mut engine = GameEngine::new(EngineOptions {
        seed: 8,
        layout: Some(layout),
        ..EngineOptions::default()
    });
    assert_eq!(engine.grid().initial_pellets(), initial);
    assert_eq!(engine.grid().to_rows().join("\n"), rows);

    drive(&mut engine, 4, 600);
    assert_eq!(engine.grid().initial_pellets(), initial);
    assert_eq!(
        engine.grid().pellets_consumed() + engine.grid().pellets_remaining(),
        initial
    );
}

#[test]
fn wall_clock_frames_drive_fixed_steps() {
    let mut engine = engine(3);
    let mut steps = 0;
    for _ in 0..60 {
        steps += engine.advance(1.0 / 60.0);
    }
    assert!((59..=60).contains(&steps));
    assert_eq!(engine.tick(), steps as u64);
    assert_eq!(engine.advance(5.0), 15);
}

#[test]
fn wandering_player_eventually_loses_last_life_and_restarts() {
    let mut engine = GameEngine::new(EngineOptions {
        seed: 11,
        starting_lives: 1,
        ..EngineOptions::default()
    });
    let mut input = Rng::new(21);
    let mut saw_game_over = false;
    let mut restarted = false;
    for _ in 0..(TICK_RATE as u64 * 600) {
        if engine.tick() % 10 == 0 {
            if let Some(dir) = input.pick(&MOVES) {
                engine.set_direction(dir);
            }
        }
        engine.step();
        let events = engine.build_snapshot(true).events;
        if events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::GameOver { .. }))
        {
            saw_game_over = true;
            assert!(engine.is_game_over());
            assert_eq!(engine.lives(), 0);
        }
        if saw_game_over && !engine.is_game_over() {
            restarted = true;
            assert_eq!(engine.lives(), 1);
            assert_eq!(engine.score(), 0);
            break;
        }
    }
    assert!(saw_game_over);
    assert!(restarted);
}
