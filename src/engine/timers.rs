/// Deferred effects. Each entry carries the level epoch it was scheduled in;
/// the engine drops entries whose epoch no longer matches when they fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TimedEvent {
    FrightenedExpired { epoch: u64 },
    RespawnAfterDeath,
    RestartAfterGameOver,
}

#[derive(Clone, Debug)]
struct TimerEntry {
    due_tick: u64,
    level_epoch: u64,
    event: TimedEvent,
}

#[derive(Clone, Debug, Default)]
pub(super) struct TimerQueue {
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub(super) fn schedule(&mut self, due_tick: u64, level_epoch: u64, event: TimedEvent) {
        self.entries.push(TimerEntry {
            due_tick,
            level_epoch,
            event,
        });
    }

    /// Removes and returns every entry due at `now`, earliest first. Entries
    /// sharing a tick keep their scheduling order.
    pub(super) fn take_due(&mut self, now: u64) -> Vec<(u64, TimedEvent)> {
        let (mut ready, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.due_tick <= now);
        self.entries = pending;
        ready.sort_by_key(|entry| entry.due_tick);
        ready
            .into_iter()
            .map(|entry| (entry.level_epoch, entry.event))
            .collect()
    }

    pub(super) fn retain_level(&mut self, level_epoch: u64) {
        self.entries.retain(|entry| entry.level_epoch == level_epoch);
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}
