use tracing::{debug, info};

use crate::constants::{
    get_fruit_score, get_frightened_ticks, get_ghost_speed, get_player_speed, seconds_to_ticks,
    AMBUSH_LOOKAHEAD_TILES, CHAIN_BASE_SCORE, CHAIN_MAX_SCORE, CHASE_PROXIMITY_TILES,
    COLLISION_RADIUS_TILES, DEATH_PAUSE_TICKS, ELROY_FIRST_REMAINING, ELROY_FIRST_SPEED,
    ELROY_SECOND_REMAINING, ELROY_SECOND_SPEED, EXTRA_LIFE_SCORE, FLANK_LOOKAHEAD_TILES,
    FRIGHTENED_SPEED_MULTIPLIER, FRUIT_LIFETIME_TICKS, FRUIT_SPAWN_COUNTS, FRUIT_TILE,
    GAME_OVER_PAUSE_TICKS, GHOST_START_TILES, HOUSE_EXIT_TILE, HOUSE_GATE_TILE,
    HOUSE_OPENING_TILE, MODE_SCHEDULE, PELLET_SCORE, PLAYER_START_TILE, POWER_ITEM_SCORE,
    RELEASE_THRESHOLDS, SCATTER_CORNERS, STARTING_LEVEL, STARTING_LIVES, TICK_RATE,
    TICK_SECONDS, TILE, TUNNEL_SPEED_MULTIPLIER,
};
use crate::frame_clock::FrameClock;
use crate::rng::Rng;
use crate::types::{
    CellKind, Direction, FruitView, GameConfig, GhostView, Mode, PlayerView, Role, RuntimeEvent,
    Snapshot, TilePos, Vec2,
};
use crate::world::{generate_maze, in_house, restock_layout, tile_center, tile_of, GridMap};

mod collision_system;
mod lifecycle;
mod mode_system;
mod motion;
mod movement;
mod release_system;
mod targeting;
mod timers;

use self::motion::{
    advance, can_turn, direction_vector, is_blocked, is_centered, leading_edge, manhattan,
    offset, opposite, snap_to_lane, wrap_x,
};
use self::targeting::choose_direction;
use self::timers::{TimedEvent, TimerQueue};

#[derive(Clone, Debug)]
struct PlayerInternal {
    pos: Vec2,
    dir: Direction,
    next_dir: Direction,
    /// Tiles per second.
    speed: f32,
    invincible: bool,
    /// Set for the death pause; movement and input are ignored.
    frozen: bool,
}

#[derive(Clone, Debug)]
struct GhostInternal {
    role: Role,
    pos: Vec2,
    dir: Direction,
    base_speed: f32,
    release_threshold: u32,
    confined: bool,
    frightened: bool,
    retreating: bool,
    /// Tile the last greedy decision was taken on.
    decided_at: Option<TilePos>,
}

#[derive(Clone, Copy, Debug)]
struct FruitInternal {
    tile: TilePos,
    score: u32,
    ticks_left: u32,
}

#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub seed: u32,
    pub adversary_tunnel_wrap: bool,
    pub starting_lives: u32,
    pub starting_level: u32,
    /// Custom maze restocked at every level start instead of the generated one.
    pub layout: Option<GridMap>,
    /// Best score carried over from a previous session.
    pub best_score: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            adversary_tunnel_wrap: false,
            starting_lives: STARTING_LIVES,
            starting_level: STARTING_LEVEL,
            layout: None,
            best_score: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: GameConfig,

    rng: Rng,
    layout: Option<GridMap>,
    grid: GridMap,
    player: PlayerInternal,
    ghosts: Vec<GhostInternal>,
    fruit: Option<FruitInternal>,
    events: Vec<RuntimeEvent>,
    timers: TimerQueue,
    clock: FrameClock,

    tick_counter: u64,
    score: u32,
    best_score: u32,
    lives: u32,
    level: u32,
    extra_life_awarded: bool,
    game_over: bool,

    mode: Mode,
    phase_index: usize,
    phase_ticks: u64,
    frightened_epoch: u64,
    level_epoch: u64,
    chain_value: u32,
    ghost_level_speed: f32,
}

impl GameEngine {
    pub fn new(options: EngineOptions) -> Self {
        let starting_lives = options.starting_lives.max(1);
        let starting_level = options.starting_level.max(1);
        let config = GameConfig {
            tick_rate: TICK_RATE,
            seed: options.seed,
            adversary_tunnel_wrap: options.adversary_tunnel_wrap,
            starting_lives,
            starting_level,
        };
        let grid = match &options.layout {
            Some(template) => template.clone(),
            None => generate_maze(starting_level),
        };

        let mut engine = Self {
            config,
            rng: Rng::new(options.seed),
            layout: options.layout,
            grid,
            player: PlayerInternal {
                pos: Vec2 { x: 0.0, y: 0.0 },
                dir: Direction::None,
                next_dir: Direction::None,
                speed: get_player_speed(starting_level),
                invincible: false,
                frozen: false,
            },
            ghosts: Vec::new(),
            fruit: None,
            events: Vec::new(),
            timers: TimerQueue::default(),
            clock: FrameClock::new(TICK_RATE),
            tick_counter: 0,
            score: 0,
            best_score: options.best_score,
            lives: starting_lives,
            level: starting_level,
            extra_life_awarded: false,
            game_over: false,
            mode: Mode::Scatter,
            phase_index: 0,
            phase_ticks: 0,
            frightened_epoch: 0,
            level_epoch: 0,
            chain_value: CHAIN_BASE_SCORE,
            ghost_level_speed: get_ghost_speed(starting_level),
        };
        engine.start_level();
        info!(
            seed = engine.config.seed,
            level = engine.level,
            lives = engine.lives,
            "engine ready"
        );
        engine
    }

    /// One fixed simulation tick. While the game is over only the timed
    /// events run, so the restart can fire.
    pub fn step(&mut self) {
        self.tick_counter += 1;
        if !self.game_over {
            self.update_mode();
            self.update_player();
            for idx in 0..self.ghosts.len() {
                self.update_ghost(idx);
            }
            self.update_difficulty();
            self.update_fruit();
            self.resolve_collisions();
        }
        self.fire_due_timers();
    }

    /// Feeds a wall-clock frame delta through the accumulator and runs every
    /// whole step it releases. Returns the number of steps taken.
    pub fn advance(&mut self, frame_seconds: f64) -> u32 {
        let steps = self.clock.accumulate(frame_seconds);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// Last write wins. `None` and input during the death pause are ignored.
    pub fn set_direction(&mut self, dir: Direction) {
        if dir == Direction::None || self.player.frozen {
            return;
        }
        self.player.next_dir = dir;
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            config: self.config.clone(),
            level: self.level,
            score: self.score,
            best_score: self.best_score,
            lives: self.lives,
            mode: self.mode,
            pellets_remaining: self.grid.pellets_remaining(),
            cells: self.grid.to_rows(),
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                dir: self.player.dir,
                next_dir: self.player.next_dir,
                invincible: self.player.invincible,
            },
            ghosts: self
                .ghosts
                .iter()
                .map(|ghost| GhostView {
                    role: ghost.role,
                    x: ghost.pos.x,
                    y: ghost.pos.y,
                    dir: ghost.dir,
                    confined: ghost.confined,
                    frightened: ghost.frightened,
                    retreating: ghost.retreating,
                })
                .collect(),
            fruit: self.fruit.map(|fruit| FruitView {
                col: fruit.tile.col,
                row: fruit.tile.row,
                score: fruit.score,
                ticks_left: fruit.ticks_left,
            }),
            game_over: self.game_over,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn player_position(&self) -> Vec2 {
        self.player.pos
    }

    pub fn player_direction(&self) -> Direction {
        self.player.dir
    }

    /// Current value the next capture would score.
    pub fn chain_value(&self) -> u32 {
        self.chain_value
    }
}
