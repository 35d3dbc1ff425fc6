use super::*;

impl GameEngine {
    pub(super) fn update_player(&mut self) {
        if self.player.frozen {
            return;
        }

        let player = &mut self.player;
        if player.next_dir != player.dir && can_turn(&self.grid, player.pos, player.next_dir) {
            player.pos = snap_to_lane(player.pos, player.next_dir);
            player.dir = player.next_dir;
        }

        if player.dir != Direction::None {
            let mut dest = advance(player.pos, player.dir, player.speed, TICK_SECONDS);
            dest.x = wrap_x(dest.x, self.grid.width_px());
            if !is_blocked(&self.grid, dest, player.dir) {
                player.pos = dest;
            }
        }

        let tile = tile_of(self.player.pos.x, self.player.pos.y);
        self.eat_at(tile);
    }

    /// Everything the player picks up by standing on `tile`. Clearing the last
    /// pellet advances the level on the spot.
    pub(super) fn eat_at(&mut self, tile: TilePos) {
        if let Some(fruit) = self.fruit {
            if fruit.tile == tile {
                self.fruit = None;
                self.award(fruit.score);
                self.events.push(RuntimeEvent::FruitEaten { score: fruit.score });
                debug!(tick = self.tick_counter, score = fruit.score, "fruit eaten");
            }
        }

        match self.grid.consume(tile) {
            Some(CellKind::Pellet) => {
                self.award(PELLET_SCORE);
                self.events.push(RuntimeEvent::PelletEaten {
                    col: tile.col,
                    row: tile.row,
                });
            }
            Some(CellKind::PowerItem) => {
                self.award(POWER_ITEM_SCORE);
                self.events.push(RuntimeEvent::PowerItemEaten {
                    col: tile.col,
                    row: tile.row,
                });
                self.enter_frightened();
            }
            _ => return,
        }

        self.on_pellet_eaten();
        if self.grid.pellets_remaining() == 0 {
            self.advance_level();
        }
    }

    pub(super) fn ghost_speed(&self, ghost_idx: usize) -> f32 {
        let ghost = &self.ghosts[ghost_idx];
        let mut speed = ghost.base_speed;
        if self.grid.is_tunnel(tile_of(ghost.pos.x, ghost.pos.y)) {
            speed *= TUNNEL_SPEED_MULTIPLIER;
        }
        if ghost.frightened {
            speed *= FRIGHTENED_SPEED_MULTIPLIER;
        }
        speed
    }

    /// House rules for stepping from `from` into `to`. Walls are checked
    /// separately.
    pub(super) fn ghost_may_enter(&self, ghost_idx: usize, from: TilePos, to: TilePos) -> bool {
        if !self.grid.in_bounds(to) && !self.config.adversary_tunnel_wrap {
            return false;
        }
        let ghost = &self.ghosts[ghost_idx];
        if ghost.retreating {
            return true;
        }
        if ghost.confined {
            return in_house(to);
        }
        if in_house(from) {
            return true;
        }
        to != TilePos::from(HOUSE_OPENING_TILE) && !in_house(to)
    }

    /// Where the adversary ends up after one tick in `dir`, or `None` when
    /// the move is refused.
    pub(super) fn ghost_destination(&self, ghost_idx: usize, dir: Direction) -> Option<Vec2> {
        if dir == Direction::None {
            return None;
        }
        let ghost = &self.ghosts[ghost_idx];
        let from = tile_of(ghost.pos.x, ghost.pos.y);
        let mut dest = advance(ghost.pos, dir, self.ghost_speed(ghost_idx), TICK_SECONDS);
        let edge = leading_edge(dest, dir);
        if self.grid.is_wall(edge) {
            return None;
        }
        if edge != from && !self.ghost_may_enter(ghost_idx, from, edge) {
            return None;
        }
        if self.config.adversary_tunnel_wrap {
            dest.x = wrap_x(dest.x, self.grid.width_px());
        } else if !self.grid.in_bounds(tile_of(dest.x, dest.y)) {
            return None;
        }
        Some(dest)
    }

    /// Re-plans at the first centered tick on each new tile, or whenever the
    /// current heading is refused, then moves.
    pub(super) fn update_ghost(&mut self, ghost_idx: usize) {
        let (pos, dir, decided_at) = {
            let ghost = &self.ghosts[ghost_idx];
            (ghost.pos, ghost.dir, ghost.decided_at)
        };
        let tile = tile_of(pos.x, pos.y);
        let blocked = self.ghost_destination(ghost_idx, dir).is_none();

        if blocked || (is_centered(pos) && decided_at != Some(tile)) {
            let target = self.ghost_target(ghost_idx);
            let chosen = choose_direction(&self.grid, tile, target, |next| {
                self.ghost_may_enter(ghost_idx, tile, next)
            });
            let ghost = &mut self.ghosts[ghost_idx];
            ghost.decided_at = Some(tile);
            if chosen != Direction::None {
                ghost.pos = snap_to_lane(ghost.pos, chosen);
                ghost.dir = chosen;
            }
        }

        let dir = self.ghosts[ghost_idx].dir;
        if let Some(dest) = self.ghost_destination(ghost_idx, dir) {
            self.ghosts[ghost_idx].pos = dest;
        }

        let ghost = &mut self.ghosts[ghost_idx];
        let at_gate = tile_of(ghost.pos.x, ghost.pos.y) == TilePos::from(HOUSE_GATE_TILE);
        if ghost.retreating && at_gate {
            ghost.retreating = false;
            ghost.confined = true;
            ghost.decided_at = None;
            debug!(tick = self.tick_counter, role = ?ghost.role, "adversary home");
        }
    }
}
