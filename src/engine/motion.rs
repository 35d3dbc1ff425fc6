use crate::constants::{TILE, TURN_TOLERANCE};
use crate::types::{Direction, TilePos, Vec2};
use crate::world::{tile_of, GridMap};

/// Offset along the travel axis: the agent's leading edge, kept just
/// inside its own tile while it is centered.
const LEADING_EDGE: f32 = TILE / 2.0 - 0.001;

pub(super) fn direction_vector(dir: Direction) -> (i32, i32) {
    match dir {
        Direction::Up => (0, -1),
        Direction::Down => (0, 1),
        Direction::Left => (-1, 0),
        Direction::Right => (1, 0),
        Direction::None => (0, 0),
    }
}

pub(super) fn opposite(dir: Direction) -> Direction {
    match dir {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
        Direction::None => Direction::None,
    }
}

pub(super) fn offset(tile: TilePos, dir: Direction) -> TilePos {
    let (dx, dy) = direction_vector(dir);
    TilePos::new(tile.col + dx, tile.row + dy)
}

pub(super) fn manhattan(a: TilePos, b: TilePos) -> i32 {
    (a.col - b.col).abs() + (a.row - b.row).abs()
}

fn lane_center(coord: f32) -> f32 {
    ((coord / TILE).floor() + 0.5) * TILE
}

pub(super) fn is_aligned(coord: f32) -> bool {
    (coord - lane_center(coord)).abs() <= TURN_TOLERANCE
}

pub(super) fn is_centered(pos: Vec2) -> bool {
    is_aligned(pos.x) && is_aligned(pos.y)
}

/// A turn is legal when the agent sits on the lane of the new axis and the
/// neighbouring cell that way is open. `None` never counts as a turn.
pub(super) fn can_turn(grid: &GridMap, pos: Vec2, dir: Direction) -> bool {
    let lane_ok = match dir {
        Direction::None => return false,
        Direction::Up | Direction::Down => is_aligned(pos.x),
        Direction::Left | Direction::Right => is_aligned(pos.y),
    };
    lane_ok && !grid.is_wall(offset(tile_of(pos.x, pos.y), dir))
}

/// Pulls the coordinate across the travel axis onto the tile center.
pub(super) fn snap_to_lane(pos: Vec2, dir: Direction) -> Vec2 {
    if dir.is_vertical() {
        Vec2 {
            x: lane_center(pos.x),
            y: pos.y,
        }
    } else if dir.is_horizontal() {
        Vec2 {
            x: pos.x,
            y: lane_center(pos.y),
        }
    } else {
        pos
    }
}

pub(super) fn advance(pos: Vec2, dir: Direction, speed_tiles: f32, dt: f32) -> Vec2 {
    let (dx, dy) = direction_vector(dir);
    let distance = speed_tiles * TILE * dt;
    Vec2 {
        x: pos.x + dx as f32 * distance,
        y: pos.y + dy as f32 * distance,
    }
}

pub(super) fn wrap_x(x: f32, width: f32) -> f32 {
    if x < 0.0 {
        x + width
    } else if x >= width {
        x - width
    } else {
        x
    }
}

/// Tile under the agent's leading edge once it stands at `dest`.
pub(super) fn leading_edge(dest: Vec2, dir: Direction) -> TilePos {
    let (dx, dy) = direction_vector(dir);
    tile_of(
        dest.x + dx as f32 * LEADING_EDGE,
        dest.y + dy as f32 * LEADING_EDGE,
    )
}

pub(super) fn is_blocked(grid: &GridMap, dest: Vec2, dir: Direction) -> bool {
    grid.is_wall(leading_edge(dest, dir))
}
