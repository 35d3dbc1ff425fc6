use super::*;

impl GameEngine {
    /// Capture value for the next adversary eaten in this frightened period:
    /// 200, 400, 800, then 1600 for every further capture.
    pub(super) fn next_chain_value(&mut self) -> u32 {
        let value = self.chain_value;
        self.chain_value = self.chain_value.saturating_mul(2).min(CHAIN_MAX_SCORE);
        value
    }

    /// Runs after every agent has moved. A frozen player is mid-death and
    /// takes no part.
    pub(super) fn resolve_collisions(&mut self) {
        let radius = COLLISION_RADIUS_TILES * TILE;
        for idx in 0..self.ghosts.len() {
            if self.player.frozen {
                break;
            }
            let ghost = &self.ghosts[idx];
            let dx = ghost.pos.x - self.player.pos.x;
            let dy = ghost.pos.y - self.player.pos.y;
            if (dx * dx + dy * dy).sqrt() >= radius {
                continue;
            }

            if ghost.frightened && !ghost.retreating {
                let role = ghost.role;
                let value = self.next_chain_value();
                self.award(value);
                let ghost = &mut self.ghosts[idx];
                ghost.retreating = true;
                ghost.frightened = false;
                ghost.decided_at = None;
                self.events.push(RuntimeEvent::AdversaryEaten { role, score: value });
                debug!(tick = self.tick_counter, role = ?role, value, "adversary captured");
            } else if !self.player.invincible && !ghost.retreating {
                self.lose_life();
            }
        }
    }
}
