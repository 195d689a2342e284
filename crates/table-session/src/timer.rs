use std::time::Duration;
use tokio::time::Instant;

/// Deadline configuration for the two kinds of clock a table runs: the per-decision
/// action timer, and the pause between showdown settling and the next hand starting.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub action: Duration,
    pub showdown: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            action: Duration::from_millis(table_core::ACTION_TIMEOUT_MS),
            showdown: Duration::from_millis(table_core::SHOWDOWN_DELAY_MS),
        }
    }
}

/// A cancellable one-shot deadline, tagged with a generation counter so a timer that
/// fires after it has already been superseded (the turn moved on, the stage changed)
/// can be told apart from a live one.
#[derive(Debug, Default)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<Instant>,
    generation: u64,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self { config, deadline: None, generation: 0 }
    }

    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }

    /// Starts (or restarts) the action clock and returns the generation stamp the
    /// caller should carry on its scheduled wakeup; compare it with `generation()`
    /// when the wakeup fires to tell a stale timer from a live one.
    pub fn start_action(&mut self) -> u64 {
        self.deadline = Some(Instant::now() + self.config.action);
        self.generation += 1;
        self.generation
    }

    pub fn start_showdown(&mut self) -> u64 {
        self.deadline = Some(Instant::now() + self.config.showdown);
        self.generation += 1;
        self.generation
    }

    /// Cancels the running deadline without bumping the generation -- a wakeup that
    /// was already in flight when this is called still carries a now-stale generation
    /// number from the matching `start_*` call, so it will be ignored.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a fire stamped with `generation` still corresponds to the live timer.
    pub fn is_current(&self, generation: u64) -> bool {
        self.deadline.is_some() && generation == self.generation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_starts_cleared() {
        let timer = Timer::with_defaults();
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }

    #[test]
    fn starting_bumps_generation_and_sets_deadline() {
        let mut timer = Timer::with_defaults();
        let gen1 = timer.start_action();
        assert_eq!(gen1, 1);
        assert!(timer.deadline().is_some());
        assert!(timer.is_current(gen1));
    }

    #[test]
    fn clearing_leaves_old_generation_stale() {
        let mut timer = Timer::with_defaults();
        let gen1 = timer.start_action();
        timer.clear();
        assert!(!timer.is_current(gen1));
    }

    #[test]
    fn restarting_invalidates_the_previous_generation() {
        let mut timer = Timer::with_defaults();
        let gen1 = timer.start_action();
        let gen2 = timer.start_action();
        assert_ne!(gen1, gen2);
        assert!(!timer.is_current(gen1));
        assert!(timer.is_current(gen2));
    }
}
