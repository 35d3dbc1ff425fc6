use clap::Parser;
use maze_chase_engine::constants::{STARTING_LEVEL, STARTING_LIVES, TICK_RATE};
use maze_chase_engine::engine::{EngineOptions, GameEngine};
use maze_chase_engine::rng::Rng;
use maze_chase_engine::types::{Direction, RuntimeEvent, Snapshot, TilePos};
use maze_chase_engine::world::{tile_of, GridMap};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const AUTOPILOT_TURN_TICKS: u64 = 12;
const AUTOPILOT_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    single: bool,
    #[arg(long)]
    seconds: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    lives: Option<u32>,
    #[arg(long)]
    level: Option<u32>,
    /// Let adversaries wrap through the side tunnels like the player does.
    #[arg(long)]
    wrap: bool,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    seconds: u32,
    seed: u32,
    #[serde(rename = "startingLives")]
    starting_lives: u32,
    #[serde(rename = "startingLevel")]
    starting_level: u32,
    #[serde(rename = "adversaryTunnelWrap")]
    adversary_tunnel_wrap: bool,
}

impl Scenario {
    fn total_ticks(&self) -> u64 {
        self.seconds as u64 * TICK_RATE as u64
    }
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    seconds: u32,
    #[serde(rename = "adversaryTunnelWrap")]
    adversary_tunnel_wrap: bool,
    outcome: Outcome,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    #[serde(rename = "finalScore")]
    final_score: u32,
    #[serde(rename = "bestScore")]
    best_score: u32,
    #[serde(rename = "maxLevel")]
    max_level: u32,
    #[serde(rename = "pelletsEaten")]
    pellets_eaten: u32,
    #[serde(rename = "powerItemsEaten")]
    power_items_eaten: u32,
    #[serde(rename = "adversariesEaten")]
    adversaries_eaten: u32,
    deaths: u32,
    #[serde(rename = "livesGained")]
    lives_gained: u32,
    #[serde(rename = "fruitsEaten")]
    fruits_eaten: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    #[serde(rename = "gameOvers")]
    game_overs: u32,
    anomalies: Vec<String>,
}

/// How a scenario's run ended, keyed for the run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Survived,
    ClearedLevel,
    GameOver,
}

impl Outcome {
    fn key(self) -> &'static str {
        match self {
            Self::Survived => "survived",
            Self::ClearedLevel => "cleared_level",
            Self::GameOver => "game_over",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioRunResult {
    #[serde(flatten)]
    result: ScenarioResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
    finished_tick: u64,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageDurationMs")]
    average_duration_ms: u64,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

/// Per-scenario event tallies.
#[derive(Clone, Debug, Default)]
struct EventCounts {
    pellets_eaten: u32,
    power_items_eaten: u32,
    adversaries_eaten: u32,
    deaths: u32,
    lives_gained: u32,
    fruits_eaten: u32,
    levels_cleared: u32,
    game_overs: u32,
}

impl EventCounts {
    fn record(&mut self, event: &RuntimeEvent) {
        match event {
            RuntimeEvent::PelletEaten { .. } => self.pellets_eaten += 1,
            RuntimeEvent::PowerItemEaten { .. } => self.power_items_eaten += 1,
            RuntimeEvent::AdversaryEaten { .. } => self.adversaries_eaten += 1,
            RuntimeEvent::PlayerDied { .. } => self.deaths += 1,
            RuntimeEvent::LifeGained { .. } => self.lives_gained += 1,
            RuntimeEvent::FruitEaten { .. } => self.fruits_eaten += 1,
            RuntimeEvent::LevelCleared { .. } => self.levels_cleared += 1,
            RuntimeEvent::GameOver { .. } => self.game_overs += 1,
            RuntimeEvent::FruitSpawned { .. } | RuntimeEvent::ModeChanged { .. } => {}
        }
    }

    fn outcome(&self) -> Outcome {
        if self.game_overs > 0 {
            Outcome::GameOver
        } else if self.levels_cleared > 0 {
            Outcome::ClearedLevel
        } else {
            Outcome::Survived
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(seed_hint, run_started_at_ms));
    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_duration_ms = 0u64;
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &match_id,
            Some(&scenario.name),
            Some(scenario.seed),
            None,
            json!({
                "seconds": scenario.seconds,
                "startingLives": scenario.starting_lives,
                "startingLevel": scenario.starting_level,
                "adversaryTunnelWrap": scenario.adversary_tunnel_wrap,
            }),
        );
        let scenario_run = run_scenario(&scenario);

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &match_id,
                Some(&scenario.name),
                Some(scenario.seed),
                Some(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        total_duration_ms += scenario_run.result.duration_ms;
        *outcome_counts
            .entry(scenario_run.result.outcome.key().to_string())
            .or_insert(0) += 1;

        emit_log(
            "info",
            "scenario_finished",
            &match_id,
            Some(&scenario.name),
            Some(scenario.seed),
            Some(scenario_run.finished_tick),
            json!({
                "outcome": scenario_run.result.outcome,
                "durationMs": scenario_run.result.duration_ms,
                "finalScore": scenario_run.result.final_score,
                "maxLevel": scenario_run.result.max_level,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&scenario_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                "error",
                "result_serialize_failed",
                &match_id,
                Some(&scenario.name),
                Some(scenario.seed),
                None,
                json!({ "error": error.to_string() }),
            ),
        }
        scenario_results.push(scenario_run.result);
    }

    let run_finished_at_ms = now_ms();
    let summary = build_run_summary(
        match_id.clone(),
        run_started_at_ms,
        run_finished_at_ms,
        scenario_results,
        outcome_counts,
        total_anomalies,
        total_duration_ms,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &match_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageDurationMs": summary.average_duration_ms,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(scenario: &Scenario) -> ScenarioRunResult {
    let mut engine = GameEngine::new(EngineOptions {
        seed: scenario.seed,
        adversary_tunnel_wrap: scenario.adversary_tunnel_wrap,
        starting_lives: scenario.starting_lives,
        starting_level: scenario.starting_level,
        ..EngineOptions::default()
    });
    // The autopilot draws from its own stream so the engine's stays untouched.
    let mut autopilot = Rng::new(scenario.seed ^ 0x9e37_79b9);

    let mut counts = EventCounts::default();
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut max_level = engine.level();
    let mut last_score = engine.score();
    let mut restart_pending = false;
    let mut last_tick = 0u64;

    for _ in 0..scenario.total_ticks() {
        if engine.tick() % AUTOPILOT_TURN_TICKS == 0 || engine.player_direction() == Direction::None
        {
            if let Some(dir) = pick_open_direction(&mut autopilot, &engine) {
                engine.set_direction(dir);
            }
        }

        engine.step();
        let snapshot = engine.build_snapshot(true);
        last_tick = snapshot.tick;
        for event in &snapshot.events {
            counts.record(event);
            if matches!(event, RuntimeEvent::GameOver { .. }) {
                restart_pending = true;
            }
        }

        let mut messages = collect_snapshot_anomalies(&snapshot, engine.grid(), scenario);
        if snapshot.score < last_score {
            if restart_pending && snapshot.score == 0 {
                restart_pending = false;
            } else {
                messages.push(format!(
                    "score went backwards: {} -> {}",
                    last_score, snapshot.score
                ));
            }
        }
        last_score = snapshot.score;
        max_level = max_level.max(snapshot.level);

        for message in messages {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
    }

    ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            seconds: scenario.seconds,
            adversary_tunnel_wrap: scenario.adversary_tunnel_wrap,
            outcome: counts.outcome(),
            duration_ms: ticks_to_ms(last_tick),
            final_score: engine.score(),
            best_score: engine.best_score(),
            max_level,
            pellets_eaten: counts.pellets_eaten,
            power_items_eaten: counts.power_items_eaten,
            adversaries_eaten: counts.adversaries_eaten,
            deaths: counts.deaths,
            lives_gained: counts.lives_gained,
            fruits_eaten: counts.fruits_eaten,
            levels_cleared: counts.levels_cleared,
            game_overs: counts.game_overs,
            anomalies,
        },
        anomaly_records,
        finished_tick: last_tick,
    }
}

/// Random non-wall heading from the player's current tile.
fn pick_open_direction(rng: &mut Rng, engine: &GameEngine) -> Option<Direction> {
    let pos = engine.player_position();
    let tile = tile_of(pos.x, pos.y);
    let open: Vec<Direction> = AUTOPILOT_DIRECTIONS
        .iter()
        .copied()
        .filter(|dir| !engine.grid().is_wall(neighbor(tile, *dir)))
        .collect();
    rng.pick(&open)
}

fn neighbor(tile: TilePos, dir: Direction) -> TilePos {
    match dir {
        Direction::Up => TilePos::new(tile.col, tile.row - 1),
        Direction::Down => TilePos::new(tile.col, tile.row + 1),
        Direction::Left => TilePos::new(tile.col - 1, tile.row),
        Direction::Right => TilePos::new(tile.col + 1, tile.row),
        Direction::None => tile,
    }
}

fn collect_snapshot_anomalies(
    snapshot: &Snapshot,
    grid: &GridMap,
    scenario: &Scenario,
) -> Vec<String> {
    let mut anomalies = Vec::new();

    let player_tile = tile_of(snapshot.player.x, snapshot.player.y);
    if grid.is_wall(player_tile) {
        anomalies.push(format!(
            "player inside wall at ({}, {})",
            player_tile.col, player_tile.row
        ));
    }

    let edible_cells: usize = snapshot
        .cells
        .iter()
        .map(|row| row.chars().filter(|ch| *ch == '.' || *ch == 'o').count())
        .sum();
    if edible_cells as u32 != snapshot.pellets_remaining {
        anomalies.push(format!(
            "pellet count mismatch: {} edible cells, {} remaining",
            edible_cells, snapshot.pellets_remaining
        ));
    }

    if grid.pellets_consumed() + grid.pellets_remaining() != grid.initial_pellets() {
        anomalies.push(format!(
            "pellet accounting broken: {} consumed + {} remaining != {}",
            grid.pellets_consumed(),
            grid.pellets_remaining(),
            grid.initial_pellets()
        ));
    }

    if snapshot.lives > scenario.starting_lives + 1 {
        anomalies.push(format!("too many lives: {}", snapshot.lives));
    }

    if snapshot.best_score < snapshot.score {
        anomalies.push(format!(
            "best score {} below score {}",
            snapshot.best_score, snapshot.score
        ));
    }

    if snapshot.ghosts.len() != 4 {
        anomalies.push(format!("adversary count: {}", snapshot.ghosts.len()));
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(now_ms));
    let starting_lives = cli.lives.unwrap_or(STARTING_LIVES).clamp(1, 9);
    let starting_level = cli.level.unwrap_or(STARTING_LEVEL).clamp(1, 256);

    if cli.single || cli.seconds.is_some() {
        let seconds = cli.seconds.unwrap_or(60).clamp(1, 3600);
        return vec![Scenario {
            name: format!("custom-{seconds}s"),
            seconds,
            seed,
            starting_lives,
            starting_level,
            adversary_tunnel_wrap: cli.wrap,
        }];
    }

    vec![
        Scenario {
            name: "quick-check".to_string(),
            seconds: 60,
            seed,
            starting_lives,
            starting_level,
            adversary_tunnel_wrap: cli.wrap,
        },
        Scenario {
            name: "endurance-wrap".to_string(),
            seconds: 300,
            seed: normalize_seed(seed as u64 + 1),
            starting_lives,
            starting_level,
            adversary_tunnel_wrap: true,
        },
    ]
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / TICK_RATE as u64
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_match_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    match_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_duration_ms: u64,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let average_duration_ms = if scenario_count == 0 {
        0
    } else {
        total_duration_ms / scenario_count as u64
    };
    RunSummary {
        match_id,
        started_at_ms,
        finished_at_ms,
        scenario_count,
        anomaly_count,
        average_duration_ms,
        outcome_counts,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    if let Ok(line) = serde_json::to_string(&log_line) {
        eprintln!("{line}");
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scenario_result(outcome: Outcome, duration_ms: u64) -> ScenarioResultLine {
        ScenarioResultLine {
            scenario: "test".to_string(),
            seed: 42,
            seconds: 60,
            adversary_tunnel_wrap: false,
            outcome,
            duration_ms,
            final_score: 0,
            best_score: 0,
            max_level: 1,
            pellets_eaten: 0,
            power_items_eaten: 0,
            adversaries_eaten: 0,
            deaths: 0,
            lives_gained: 0,
            fruits_eaten: 0,
            levels_cleared: 0,
            game_overs: 0,
            anomalies: Vec::new(),
        }
    }

    fn scenario(seconds: u32) -> Scenario {
        Scenario {
            name: "test".to_string(),
            seconds,
            seed: 7,
            starting_lives: STARTING_LIVES,
            starting_level: STARTING_LEVEL,
            adversary_tunnel_wrap: false,
        }
    }

    #[test]
    fn default_match_id_contains_seed_and_timestamp() {
        assert_eq!(default_match_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_calculates_average_duration() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            1,
            2,
            vec![
                make_scenario_result(Outcome::Survived, 60_000),
                make_scenario_result(Outcome::GameOver, 90_000),
            ],
            BTreeMap::from([
                ("survived".to_string(), 1usize),
                ("game_over".to_string(), 1usize),
            ]),
            1,
            150_000,
        );
        assert_eq!(summary.average_duration_ms, 75_000);
        assert_eq!(summary.scenario_count, 2);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("maze-chase-missing-{}", now_ms()))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            1,
            2,
            vec![make_scenario_result(Outcome::Survived, 60_000)],
            BTreeMap::from([("survived".to_string(), 1usize)]),
            0,
            60_000,
        );
        let result = write_summary(&target, &summary);
        assert!(result.is_err());
    }

    #[test]
    fn push_anomaly_keeps_records_and_deduplicates_summary_messages() {
        let mut anomalies = Vec::new();
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        push_anomaly(
            &mut anomalies,
            &mut records,
            &mut seen,
            10,
            "same anomaly".to_string(),
        );
        push_anomaly(
            &mut anomalies,
            &mut records,
            &mut seen,
            11,
            "same anomaly".to_string(),
        );

        assert_eq!(anomalies.len(), 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tick, 10);
        assert_eq!(records[1].tick, 11);
    }

    #[test]
    fn outcome_prefers_game_over_over_level_clears() {
        let mut counts = EventCounts::default();
        assert_eq!(counts.outcome(), Outcome::Survived);
        counts.record(&RuntimeEvent::LevelCleared { level: 1 });
        assert_eq!(counts.outcome(), Outcome::ClearedLevel);
        counts.record(&RuntimeEvent::GameOver { final_score: 10 });
        assert_eq!(counts.outcome(), Outcome::GameOver);
        counts.record(&RuntimeEvent::ModeChanged {
            mode: maze_chase_engine::types::Mode::Chase,
        });
        assert_eq!(counts.levels_cleared, 1);
        assert_eq!(counts.game_overs, 1);
    }

    #[test]
    fn short_scenario_runs_clean() {
        let run = run_scenario(&scenario(20));
        assert_eq!(run.finished_tick, 20 * TICK_RATE as u64);
        assert_eq!(run.result.duration_ms, 20_000);
        assert!(run.result.anomalies.is_empty(), "{:?}", run.result.anomalies);
        assert!(run.result.pellets_eaten > 0);
    }

    #[test]
    fn same_seed_gives_same_result() {
        let first = run_scenario(&scenario(10));
        let second = run_scenario(&scenario(10));
        assert_eq!(first.result.final_score, second.result.final_score);
        assert_eq!(first.result.pellets_eaten, second.result.pellets_eaten);
        assert_eq!(first.result.deaths, second.result.deaths);
    }

    #[test]
    fn explicit_seconds_select_a_single_scenario() {
        let cli = Cli::parse_from(["simulate", "--seconds", "90", "--seed", "5", "--wrap"]);
        let scenarios = resolve_scenarios(&cli);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].seconds, 90);
        assert_eq!(scenarios[0].seed, 5);
        assert!(scenarios[0].adversary_tunnel_wrap);

        let cli = Cli::parse_from(["simulate", "--seed", "5"]);
        let scenarios = resolve_scenarios(&cli);
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[1].seed, 6);
    }
}
