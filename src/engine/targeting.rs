use super::*;

/// Tie-break order for the greedy step.
const DECISION_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

/// What the role strategies look at when picking a pursuit tile.
#[derive(Clone, Copy, Debug)]
pub(super) struct PursuitView {
    pub player_tile: TilePos,
    pub player_dir: Direction,
    pub aggressive_tile: TilePos,
}

pub(super) fn scatter_corner(role: Role) -> TilePos {
    SCATTER_CORNERS[role.index()].into()
}

/// `tiles` ahead of the player. Facing up also shifts one tile left, the
/// same overflow the arcade board had.
pub(super) fn ahead_of_player(player_tile: TilePos, dir: Direction, tiles: i32) -> TilePos {
    let (dx, dy) = direction_vector(dir);
    let skew = if dir == Direction::Up { -1 } else { 0 };
    TilePos::new(
        player_tile.col + dx * tiles + skew,
        player_tile.row + dy * tiles,
    )
}

pub(super) fn role_target(role: Role, ghost_tile: TilePos, view: &PursuitView) -> TilePos {
    match role {
        Role::Aggressive => view.player_tile,
        Role::Ambusher => {
            ahead_of_player(view.player_tile, view.player_dir, AMBUSH_LOOKAHEAD_TILES)
        }
        Role::Flanker => {
            let pivot = ahead_of_player(view.player_tile, view.player_dir, FLANK_LOOKAHEAD_TILES);
            let anchor = view.aggressive_tile;
            TilePos::new(
                anchor.col + 2 * (pivot.col - anchor.col),
                anchor.row + 2 * (pivot.row - anchor.row),
            )
        }
        Role::Erratic => {
            let dc = (ghost_tile.col - view.player_tile.col) as f32;
            let dr = (ghost_tile.row - view.player_tile.row) as f32;
            if (dc * dc + dr * dr).sqrt() >= CHASE_PROXIMITY_TILES {
                view.player_tile
            } else {
                scatter_corner(Role::Erratic)
            }
        }
    }
}

/// One-step greedy choice: the open neighbour closest to `target` by
/// Manhattan distance. Returns `Direction::None` when every move is refused.
pub(super) fn choose_direction(
    grid: &GridMap,
    from: TilePos,
    target: TilePos,
    allowed: impl Fn(TilePos) -> bool,
) -> Direction {
    let mut best = Direction::None;
    let mut best_distance = i32::MAX;
    for dir in DECISION_ORDER {
        let next = offset(from, dir);
        if grid.is_wall(next) || !allowed(next) {
            continue;
        }
        let distance = manhattan(next, target);
        if distance < best_distance {
            best = dir;
            best_distance = distance;
        }
    }
    best
}

impl GameEngine {
    /// Target tile for the adversary's next decision. Draws from the engine
    /// rng only for frightened adversaries, and only when called.
    pub(super) fn ghost_target(&mut self, ghost_idx: usize) -> TilePos {
        let ghost = &self.ghosts[ghost_idx];
        let role = ghost.role;
        let frightened = ghost.frightened;
        let tile = tile_of(ghost.pos.x, ghost.pos.y);

        if ghost.confined || ghost.retreating {
            return HOUSE_GATE_TILE.into();
        }
        if in_house(tile) || tile == TilePos::from(HOUSE_OPENING_TILE) {
            return HOUSE_EXIT_TILE.into();
        }
        if frightened {
            let dir = self.rng.pick(&DECISION_ORDER).unwrap_or(Direction::Up);
            return offset(tile, dir);
        }
        if self.scheduled_mode() == Mode::Scatter {
            return scatter_corner(role);
        }

        let aggressive = &self.ghosts[Role::Aggressive.index()];
        let view = PursuitView {
            player_tile: tile_of(self.player.pos.x, self.player.pos.y),
            player_dir: self.player.dir,
            aggressive_tile: tile_of(aggressive.pos.x, aggressive.pos.y),
        };
        role_target(role, tile, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generate_maze;

    fn view(player: (i32, i32), dir: Direction, aggressive: (i32, i32)) -> PursuitView {
        PursuitView {
            player_tile: player.into(),
            player_dir: dir,
            aggressive_tile: aggressive.into(),
        }
    }

    #[test]
    fn aggressive_targets_player_tile() {
        let v = view((10, 20), Direction::Left, (1, 1));
        assert_eq!(
            role_target(Role::Aggressive, TilePos::new(3, 3), &v),
            TilePos::new(10, 20)
        );
    }

    #[test]
    fn ambusher_leads_the_player_with_up_skew() {
        let facing_up = view((10, 20), Direction::Up, (1, 1));
        assert_eq!(
            role_target(Role::Ambusher, TilePos::new(1, 1), &facing_up),
            TilePos::new(9, 16)
        );
        let facing_right = view((10, 20), Direction::Right, (1, 1));
        assert_eq!(
            role_target(Role::Ambusher, TilePos::new(1, 1), &facing_right),
            TilePos::new(14, 20)
        );
        let idle = view((10, 20), Direction::None, (1, 1));
        assert_eq!(
            role_target(Role::Ambusher, TilePos::new(1, 1), &idle),
            TilePos::new(10, 20)
        );
    }

    #[test]
    fn flanker_mirrors_aggressive_through_pivot() {
        let v = view((10, 20), Direction::Right, (20, 20));
        assert_eq!(
            role_target(Role::Flanker, TilePos::new(1, 1), &v),
            TilePos::new(4, 20)
        );
        let up = view((10, 20), Direction::Up, (10, 24));
        // pivot (9, 18): 10 + 2 * (9 - 10), 24 + 2 * (18 - 24)
        assert_eq!(
            role_target(Role::Flanker, TilePos::new(1, 1), &up),
            TilePos::new(8, 12)
        );
    }

    #[test]
    fn erratic_backs_off_inside_proximity_radius() {
        let v = view((10, 20), Direction::Left, (1, 1));
        assert_eq!(
            role_target(Role::Erratic, TilePos::new(10, 5), &v),
            TilePos::new(10, 20)
        );
        assert_eq!(
            role_target(Role::Erratic, TilePos::new(10, 12), &v),
            TilePos::new(10, 20)
        );
        assert_eq!(
            role_target(Role::Erratic, TilePos::new(12, 18), &v),
            scatter_corner(Role::Erratic)
        );
    }

    #[test]
    fn scatter_corners_are_distinct() {
        let corners: Vec<TilePos> = Role::ALL.iter().map(|role| scatter_corner(*role)).collect();
        assert_eq!(corners[0], TilePos::new(25, 2));
        assert_eq!(corners[1], TilePos::new(2, 2));
        assert_eq!(corners[2], TilePos::new(25, 28));
        assert_eq!(corners[3], TilePos::new(2, 28));
    }

    #[test]
    fn greedy_choice_breaks_ties_up_left_down_right() {
        let grid = generate_maze(1);
        // (14, 22): all four neighbours open, target equidistant from each.
        let from = TilePos::new(14, 22);
        assert_eq!(choose_direction(&grid, from, from, |_| true), Direction::Up);
        assert_eq!(
            choose_direction(&grid, from, from, |tile| tile.row >= 22),
            Direction::Left
        );
        assert_eq!(
            choose_direction(&grid, from, from, |tile| tile.row > 22 || tile.col > 14),
            Direction::Down
        );
        assert_eq!(
            choose_direction(&grid, from, TilePos::new(20, 22), |_| true),
            Direction::Right
        );
    }

    #[test]
    fn greedy_choice_rejects_walls_and_reports_none() {
        let grid = generate_maze(1);
        // (14, 23) has a pillar on its left, so the closest move is refused.
        let from = TilePos::new(14, 23);
        assert_eq!(
            choose_direction(&grid, from, TilePos::new(1, 23), |_| true),
            Direction::Up
        );
        assert_eq!(
            choose_direction(&grid, from, from, |_| false),
            Direction::None
        );
    }
}
