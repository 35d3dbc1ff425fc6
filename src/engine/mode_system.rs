use super::*;

impl GameEngine {
    /// Mode the schedule says is current, ignoring any frightened override.
    pub(super) fn scheduled_mode(&self) -> Mode {
        MODE_SCHEDULE[self.phase_index].1
    }

    /// Advances the scatter/chase schedule by one tick. The phase clock is
    /// paused while frightened; the final phase never ends.
    pub(super) fn update_mode(&mut self) {
        if self.mode == Mode::Frightened {
            return;
        }
        let Some(seconds) = MODE_SCHEDULE[self.phase_index].0 else {
            return;
        };
        self.phase_ticks += 1;
        if self.phase_ticks < seconds_to_ticks(seconds as f32) {
            return;
        }

        self.phase_index = (self.phase_index + 1).min(MODE_SCHEDULE.len() - 1);
        self.phase_ticks = 0;
        self.mode = self.scheduled_mode();
        self.reverse_ghosts();
        self.events.push(RuntimeEvent::ModeChanged { mode: self.mode });
        debug!(
            tick = self.tick_counter,
            phase = self.phase_index,
            mode = ?self.mode,
            "mode phase changed"
        );
    }

    pub(super) fn reverse_ghosts(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.dir = opposite(ghost.dir);
        }
    }

    /// Power item handler. A newer frightened period supersedes the pending
    /// expiry of an older one through the epoch counter.
    pub(super) fn enter_frightened(&mut self) {
        let was_frightened = self.mode == Mode::Frightened;
        self.mode = Mode::Frightened;
        self.frightened_epoch += 1;
        self.chain_value = CHAIN_BASE_SCORE;
        for ghost in &mut self.ghosts {
            if !ghost.retreating {
                ghost.frightened = true;
            }
        }

        let due = self.tick_counter + get_frightened_ticks(self.level);
        self.timers.schedule(
            due,
            self.level_epoch,
            TimedEvent::FrightenedExpired {
                epoch: self.frightened_epoch,
            },
        );
        if !was_frightened {
            self.events.push(RuntimeEvent::ModeChanged {
                mode: Mode::Frightened,
            });
        }
        debug!(tick = self.tick_counter, until = due, epoch = self.frightened_epoch, "frightened");
    }

    pub(super) fn end_frightened(&mut self) {
        if self.mode != Mode::Frightened {
            return;
        }
        for ghost in &mut self.ghosts {
            ghost.frightened = false;
        }
        self.mode = self.scheduled_mode();
        self.events.push(RuntimeEvent::ModeChanged { mode: self.mode });
        debug!(tick = self.tick_counter, mode = ?self.mode, "frightened expired");
    }
}
