use std::time::{Duration, Instant};

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Countdown resolution
pub const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// One-second schedule for the countdown
///
/// The event loop wakes more often than once a second, so it asks how many
/// whole seconds came due since the last call. Stopping drops the schedule;
/// starting again measures a fresh second from that moment.
#[derive(Debug, Clone, Default)]
pub struct SecondTicker {
    next_due: Option<Instant>,
}

impl SecondTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + COUNTDOWN_STEP);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of whole seconds elapsed since the last due tick
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += COUNTDOWN_STEP;
        }
        self.next_due = Some(due);
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_stopped_ticker_never_fires() {
        let mut ticker = SecondTicker::new();
        let now = Instant::now();
        assert!(!ticker.is_active());
        assert_eq!(ticker.due_ticks(now + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_counts_whole_seconds() {
        let mut ticker = SecondTicker::new();
        let start = Instant::now();
        ticker.start(start);

        assert_eq!(ticker.due_ticks(start + Duration::from_millis(999)), 0);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(1000)), 1);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(1500)), 0);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(4200)), 3);
    }

    #[test]
    fn test_restart_measures_from_resume() {
        let mut ticker = SecondTicker::new();
        let start = Instant::now();
        ticker.start(start);
        ticker.stop();

        let resumed = start + Duration::from_secs(30);
        ticker.start(resumed);
        assert_eq!(ticker.due_ticks(resumed + Duration::from_millis(500)), 0);
        assert_eq!(ticker.due_ticks(resumed + Duration::from_secs(1)), 1);
    }
}
