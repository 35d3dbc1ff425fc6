use crate::types::Mode;

pub const TICK_RATE: u32 = 60;
pub const TICK_SECONDS: f32 = 1.0 / TICK_RATE as f32;
pub const MAX_FRAME_SECONDS: f64 = 0.25;

pub const COLS: i32 = 28;
pub const ROWS: i32 = 31;
pub const TILE: f32 = 8.0;

pub const TURN_TOLERANCE: f32 = TILE / 4.0;
pub const COLLISION_RADIUS_TILES: f32 = 0.6;

pub const PELLET_SCORE: u32 = 10;
pub const POWER_ITEM_SCORE: u32 = 50;
pub const CHAIN_BASE_SCORE: u32 = 200;
pub const CHAIN_MAX_SCORE: u32 = 1_600;
pub const EXTRA_LIFE_SCORE: u32 = 10_000;

pub const STARTING_LIVES: u32 = 3;
pub const STARTING_LEVEL: u32 = 1;
pub const KILL_SCREEN_LEVEL: u32 = 256;

pub const PLAYER_BASE_SPEED: f32 = 6.0;
pub const PLAYER_MAX_SPEED: f32 = 8.0;
pub const PLAYER_SPEED_PER_LEVEL: f32 = 0.15;
pub const GHOST_BASE_SPEED: f32 = 5.5;
pub const GHOST_MAX_SPEED: f32 = 7.2;
pub const GHOST_SPEED_PER_LEVEL: f32 = 0.12;
pub const TUNNEL_SPEED_MULTIPLIER: f32 = 0.6;
pub const FRIGHTENED_SPEED_MULTIPLIER: f32 = 0.8;

pub const ELROY_FIRST_REMAINING: u32 = 60;
pub const ELROY_FIRST_SPEED: f32 = 6.2;
pub const ELROY_SECOND_REMAINING: u32 = 20;
pub const ELROY_SECOND_SPEED: f32 = 6.5;

pub const RELEASE_THRESHOLDS: [u32; 4] = [0, 20, 40, 60];

pub const FRUIT_SPAWN_COUNTS: [u32; 2] = [70, 170];
pub const FRUIT_LIFETIME_TICKS: u32 = 10 * TICK_RATE;
pub const FRUIT_TILE: (i32, i32) = (13, 19);
pub const FRUIT_SCORES: [u32; 5] = [100, 300, 500, 700, 1_000];

pub const FRIGHTENED_BASE_SECONDS: f32 = 6.0;
pub const FRIGHTENED_STEP_SECONDS: f32 = 0.25;
pub const FRIGHTENED_MIN_SECONDS: f32 = 0.8;

pub const DEATH_PAUSE_TICKS: u64 = 78;
pub const GAME_OVER_PAUSE_TICKS: u64 = 60;

pub const CHASE_PROXIMITY_TILES: f32 = 8.0;
pub const AMBUSH_LOOKAHEAD_TILES: i32 = 4;
pub const FLANK_LOOKAHEAD_TILES: i32 = 2;

pub const HOUSE_GATE_TILE: (i32, i32) = (13, 15);
pub const HOUSE_EXIT_TILE: (i32, i32) = (13, 12);
pub const HOUSE_OPENING_TILE: (i32, i32) = (13, 13);
/// Inclusive (col_min, row_min, col_max, row_max) of the house walls.
pub const HOUSE_BOUNDS: (i32, i32, i32, i32) = (10, 13, 17, 17);

pub const PLAYER_START_TILE: (i32, i32) = (14, 23);
pub const GHOST_START_TILES: [(i32, i32); 4] = [(14, 11), (13, 14), (14, 14), (15, 14)];
pub const SCATTER_CORNERS: [(i32, i32); 4] = [
    (COLS - 3, 2),
    (2, 2),
    (COLS - 3, ROWS - 3),
    (2, ROWS - 3),
];

/// `None` duration means the phase never ends.
pub const MODE_SCHEDULE: [(Option<u32>, Mode); 7] = [
    (Some(7), Mode::Scatter),
    (Some(20), Mode::Chase),
    (Some(7), Mode::Scatter),
    (Some(20), Mode::Chase),
    (Some(5), Mode::Scatter),
    (Some(20), Mode::Chase),
    (None, Mode::Chase),
];

pub fn seconds_to_ticks(seconds: f32) -> u64 {
    (seconds * TICK_RATE as f32).round().max(0.0) as u64
}

pub fn get_player_speed(level: u32) -> f32 {
    (PLAYER_BASE_SPEED + level.saturating_sub(1) as f32 * PLAYER_SPEED_PER_LEVEL)
        .min(PLAYER_MAX_SPEED)
}

pub fn get_ghost_speed(level: u32) -> f32 {
    (GHOST_BASE_SPEED + level.saturating_sub(1) as f32 * GHOST_SPEED_PER_LEVEL)
        .min(GHOST_MAX_SPEED)
}

pub fn get_frightened_ticks(level: u32) -> u64 {
    let seconds = (FRIGHTENED_BASE_SECONDS
        - level.saturating_sub(1) as f32 * FRIGHTENED_STEP_SECONDS)
        .max(FRIGHTENED_MIN_SECONDS);
    seconds_to_ticks(seconds)
}

pub fn get_fruit_score(level: u32) -> u32 {
    let tier = (level.saturating_sub(1) / 3) as usize;
    FRUIT_SCORES[tier.min(FRUIT_SCORES.len() - 1)]
}
