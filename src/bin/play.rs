use clap::Parser;
use maze_chase_engine::best_score_store::BestScoreStore;
use maze_chase_engine::constants::{STARTING_LEVEL, STARTING_LIVES};
use maze_chase_engine::engine::{EngineOptions, GameEngine};
use maze_chase_engine::types::{Direction, RuntimeEvent};
use maze_chase_engine::world::GridMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

const FRAME_MS: u64 = 16;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    /// Maze text file, 28 columns by 31 rows.
    #[arg(long)]
    layout: Option<PathBuf>,
    #[arg(long)]
    wrap: bool,
    #[arg(long)]
    lives: Option<u32>,
    #[arg(long)]
    level: Option<u32>,
    /// Print a snapshot every N frames.
    #[arg(long, default_value_t = 4)]
    snapshot_every: u64,
    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Input {
    Turn(Direction),
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(Input::Quit),
        other => Direction::parse_move(other).map(Input::Turn),
    }
}

fn load_layout(path: &Path) -> Result<GridMap, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(GridMap::parse_standard(&text)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let layout = match cli.layout.as_deref() {
        Some(path) => match load_layout(path) {
            Ok(grid) => Some(grid),
            Err(error) => {
                eprintln!("[play] cannot use layout {}: {error}", path.display());
                std::process::exit(2);
            }
        },
        None => None,
    };

    let best_score_path = std::env::var("BEST_SCORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".data/best-score.json"));
    let mut store = BestScoreStore::new(best_score_path);

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut engine = GameEngine::new(EngineOptions {
        seed,
        adversary_tunnel_wrap: cli.wrap,
        starting_lives: cli.lives.unwrap_or(STARTING_LIVES),
        starting_level: cli.level.unwrap_or(STARTING_LEVEL),
        layout,
        best_score: store.best_score(),
    });
    info!(
        seed,
        best_score = store.best_score(),
        store = %store.path().display(),
        "play started"
    );

    let (tx, mut rx) = mpsc::channel::<Input>(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(input) = parse_input(&line) else {
                warn!(line = %line.trim(), "unrecognised input");
                continue;
            };
            if tx.send(input).await.is_err() {
                break;
            }
        }
    });

    let snapshot_every = cli.snapshot_every.max(1);
    let mut interval = tokio::time::interval(Duration::from_millis(FRAME_MS));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last_frame = Instant::now();
    let mut frame = 0u64;

    'frames: loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => break 'frames,
        }

        while let Ok(input) = rx.try_recv() {
            match input {
                Input::Turn(dir) => engine.set_direction(dir),
                Input::Quit => break 'frames,
            }
        }

        let now = Instant::now();
        engine.advance(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;
        frame += 1;

        if frame % snapshot_every == 0 {
            let snapshot = engine.build_snapshot(true);
            if snapshot
                .events
                .iter()
                .any(|event| matches!(event, RuntimeEvent::GameOver { .. }))
            {
                store.record(engine.best_score());
            }
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(error) => warn!(%error, "snapshot did not serialize"),
            }
        }

        if cli.frames.is_some_and(|limit| frame >= limit) {
            break;
        }
    }

    store.record(engine.best_score());
    info!(
        frames = frame,
        ticks = engine.tick(),
        score = engine.score(),
        best_score = store.best_score(),
        "play finished"
    );
}
