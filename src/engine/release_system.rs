use super::*;

pub(super) fn elroy_speed(level_speed: f32, remaining: u32) -> f32 {
    if remaining <= ELROY_SECOND_REMAINING {
        level_speed.max(ELROY_SECOND_SPEED)
    } else if remaining <= ELROY_FIRST_REMAINING {
        level_speed.max(ELROY_FIRST_SPEED)
    } else {
        level_speed
    }
}

impl GameEngine {
    /// Releases confined adversaries whose threshold has been reached and
    /// applies the pellet-driven speed-up to the aggressive one.
    pub(super) fn update_difficulty(&mut self) {
        let eaten = self.grid.pellets_consumed();
        let tick = self.tick_counter;
        for ghost in &mut self.ghosts {
            if ghost.confined && !ghost.retreating && eaten >= ghost.release_threshold {
                ghost.confined = false;
                ghost.decided_at = None;
                debug!(tick, role = ?ghost.role, eaten, "adversary released");
            }
        }

        let remaining = self.grid.pellets_remaining();
        let speed = elroy_speed(self.ghost_level_speed, remaining);
        if let Some(aggressive) = self.ghosts.get_mut(Role::Aggressive.index()) {
            aggressive.base_speed = speed;
        }
    }

    /// Bookkeeping after every pellet or power item. Fruit appears on fixed
    /// cumulative counts unless one is already out.
    pub(super) fn on_pellet_eaten(&mut self) {
        let eaten = self.grid.pellets_consumed();
        if !FRUIT_SPAWN_COUNTS.contains(&eaten) || self.fruit.is_some() {
            return;
        }
        let tile = TilePos::from(FRUIT_TILE);
        let score = get_fruit_score(self.level);
        self.fruit = Some(FruitInternal {
            tile,
            score,
            ticks_left: FRUIT_LIFETIME_TICKS,
        });
        self.events.push(RuntimeEvent::FruitSpawned {
            col: tile.col,
            row: tile.row,
            score,
        });
        debug!(tick = self.tick_counter, eaten, score, "fruit spawned");
    }

    pub(super) fn update_fruit(&mut self) {
        let Some(fruit) = self.fruit.as_mut() else {
            return;
        };
        fruit.ticks_left = fruit.ticks_left.saturating_sub(1);
        if fruit.ticks_left == 0 {
            self.fruit = None;
        }
    }
}
