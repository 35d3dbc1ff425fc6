use super::*;

fn spawn_point(tile: (i32, i32)) -> Vec2 {
    let (x, y) = tile_center(tile.into());
    Vec2 { x, y }
}

impl GameEngine {
    /// Regenerates the maze and puts every counter that is scoped to a level
    /// back to its initial value. Timers from the previous level are dropped.
    pub(super) fn start_level(&mut self) {
        self.level_epoch += 1;
        self.timers.retain_level(self.level_epoch);

        self.grid = match &self.layout {
            Some(template) => restock_layout(template, self.level),
            None => generate_maze(self.level),
        };
        self.phase_index = 0;
        self.phase_ticks = 0;
        self.mode = self.scheduled_mode();
        self.chain_value = CHAIN_BASE_SCORE;
        self.fruit = None;

        self.player.speed = get_player_speed(self.level);
        self.ghost_level_speed = get_ghost_speed(self.level);
        self.ghosts = Role::ALL
            .iter()
            .map(|role| GhostInternal {
                role: *role,
                pos: spawn_point(GHOST_START_TILES[role.index()]),
                dir: Direction::None,
                base_speed: self.ghost_level_speed,
                release_threshold: RELEASE_THRESHOLDS[role.index()],
                confined: true,
                frightened: false,
                retreating: false,
                decided_at: None,
            })
            .collect();
        self.reset_positions();
        self.player.invincible = false;
        self.player.frozen = false;

        debug!(
            level = self.level,
            pellets = self.grid.initial_pellets(),
            player_speed = self.player.speed,
            ghost_speed = self.ghost_level_speed,
            "level started"
        );
    }

    /// Agents back to their start tiles; flags are left alone.
    pub(super) fn reset_positions(&mut self) {
        self.player.pos = spawn_point(PLAYER_START_TILE);
        self.player.dir = Direction::None;
        self.player.next_dir = Direction::None;
        for ghost in &mut self.ghosts {
            ghost.pos = spawn_point(GHOST_START_TILES[ghost.role.index()]);
            ghost.dir = Direction::None;
            ghost.decided_at = None;
        }
    }

    pub(super) fn advance_level(&mut self) {
        self.events.push(RuntimeEvent::LevelCleared { level: self.level });
        info!(level = self.level, score = self.score, "level cleared");
        self.level = self.level.saturating_add(1);
        self.start_level();
    }

    pub(super) fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.best_score {
            self.best_score = self.score;
        }
        if !self.extra_life_awarded && self.score >= EXTRA_LIFE_SCORE {
            self.extra_life_awarded = true;
            self.lives = self.lives.saturating_add(1);
            self.events.push(RuntimeEvent::LifeGained { lives: self.lives });
            debug!(score = self.score, lives = self.lives, "extra life");
        }
    }

    pub(super) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.player.invincible = true;
        self.player.frozen = true;
        self.events.push(RuntimeEvent::PlayerDied {
            lives_left: self.lives,
        });
        debug!(tick = self.tick_counter, lives = self.lives, "player died");

        if self.lives == 0 {
            self.enter_game_over();
        } else {
            self.timers.schedule(
                self.tick_counter + DEATH_PAUSE_TICKS,
                self.level_epoch,
                TimedEvent::RespawnAfterDeath,
            );
        }
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        self.events.push(RuntimeEvent::GameOver {
            final_score: self.score,
        });
        info!(score = self.score, level = self.level, "game over");
        self.timers.schedule(
            self.tick_counter + GAME_OVER_PAUSE_TICKS,
            self.level_epoch,
            TimedEvent::RestartAfterGameOver,
        );
    }

    fn restart_game(&mut self) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.level = self.config.starting_level;
        self.extra_life_awarded = false;
        self.game_over = false;
        self.start_level();
    }

    /// Positions only. A frightened period or a retreat in progress carries
    /// on after the respawn.
    fn respawn_after_death(&mut self) {
        self.reset_positions();
        self.player.invincible = false;
        self.player.frozen = false;
    }

    pub(super) fn fire_due_timers(&mut self) {
        for (level_epoch, event) in self.timers.take_due(self.tick_counter) {
            if level_epoch != self.level_epoch {
                continue;
            }
            match event {
                TimedEvent::FrightenedExpired { epoch } => {
                    if epoch == self.frightened_epoch {
                        self.end_frightened();
                    }
                }
                TimedEvent::RespawnAfterDeath => self.respawn_after_death(),
                TimedEvent::RestartAfterGameOver => self.restart_game(),
            }
        }
    }
}
