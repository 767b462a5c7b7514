use std::time::{Duration, Instant};

/// Stages of the rest overlay animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestStage {
    Hidden,
    /// Task panes fade out
    Dimming,
    /// Rest card slides in
    Entering,
    Resting,
    Exiting,
}

impl RestStage {
    /// How long a stage lasts before the next one is due, and what follows
    fn successor(&self) -> Option<(RestStage, Duration)> {
        match self {
            Self::Dimming => Some((Self::Entering, Duration::from_millis(400))),
            Self::Entering => Some((Self::Resting, Duration::from_millis(600))),
            Self::Exiting => Some((Self::Hidden, Duration::from_millis(500))),
            Self::Hidden | Self::Resting => None,
        }
    }

    /// Whether the rest overlay should be drawn at all
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden | Self::Dimming)
    }
}

/// Staged rest-mode transition with a single pending step
///
/// Only one transition is ever scheduled. Entering or leaving rest replaces
/// whatever was pending, and `cancel` drops it so nothing fires late.
#[derive(Debug, Clone)]
pub struct RestStaging {
    stage: RestStage,
    scheduled: Option<(RestStage, Instant)>,
}

impl Default for RestStaging {
    fn default() -> Self {
        Self::new()
    }
}

impl RestStaging {
    pub fn new() -> Self {
        Self {
            stage: RestStage::Hidden,
            scheduled: None,
        }
    }

    pub fn stage(&self) -> RestStage {
        self.stage
    }

    pub fn has_pending(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Begin the enter sequence (Dimming -> Entering -> Resting)
    pub fn enter(&mut self, now: Instant) {
        if matches!(self.stage, RestStage::Resting) {
            return;
        }
        self.set_stage(RestStage::Dimming, now);
    }

    /// Begin the exit sequence (Exiting -> Hidden)
    pub fn exit(&mut self, now: Instant) {
        match self.stage {
            RestStage::Hidden => self.scheduled = None,
            // Nothing on screen yet, drop straight back
            RestStage::Dimming => self.cancel(),
            _ => self.set_stage(RestStage::Exiting, now),
        }
    }

    /// Clear the pending step and hide immediately
    pub fn cancel(&mut self) {
        self.scheduled = None;
        self.stage = RestStage::Hidden;
    }

    /// Fire the pending step if it is due; returns the new stage when it changed
    pub fn poll(&mut self, now: Instant) -> Option<RestStage> {
        let (next, due) = self.scheduled?;
        if now < due {
            return None;
        }
        self.set_stage(next, due);
        Some(next)
    }

    fn set_stage(&mut self, stage: RestStage, at: Instant) {
        self.stage = stage;
        self.scheduled = stage
            .successor()
            .map(|(next, after)| (next, at + after));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_sequence() {
        let t0 = Instant::now();
        let mut staging = RestStaging::new();
        staging.enter(t0);
        assert_eq!(staging.stage(), RestStage::Dimming);

        assert_eq!(staging.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            staging.poll(t0 + Duration::from_millis(400)),
            Some(RestStage::Entering)
        );
        assert_eq!(
            staging.poll(t0 + Duration::from_millis(1000)),
            Some(RestStage::Resting)
        );
        assert!(!staging.has_pending());
    }

    #[test]
    fn test_poll_catches_up_one_step_at_a_time() {
        let t0 = Instant::now();
        let mut staging = RestStaging::new();
        staging.enter(t0);
        let late = t0 + Duration::from_secs(5);
        assert_eq!(staging.poll(late), Some(RestStage::Entering));
        assert_eq!(staging.poll(late), Some(RestStage::Resting));
        assert_eq!(staging.poll(late), None);
    }

    #[test]
    fn test_exit_sequence() {
        let t0 = Instant::now();
        let mut staging = RestStaging::new();
        staging.enter(t0);
        staging.poll(t0 + Duration::from_secs(2));
        staging.poll(t0 + Duration::from_secs(2));
        assert_eq!(staging.stage(), RestStage::Resting);

        staging.exit(t0 + Duration::from_secs(3));
        assert_eq!(staging.stage(), RestStage::Exiting);
        assert_eq!(
            staging.poll(t0 + Duration::from_secs(4)),
            Some(RestStage::Hidden)
        );
    }

    #[test]
    fn test_exit_during_enter_replaces_pending_step() {
        let t0 = Instant::now();
        let mut staging = RestStaging::new();
        staging.enter(t0);
        staging.poll(t0 + Duration::from_millis(400));
        assert_eq!(staging.stage(), RestStage::Entering);

        staging.exit(t0 + Duration::from_millis(500));
        // The Entering -> Resting step must not fire any more
        assert_eq!(
            staging.poll(t0 + Duration::from_millis(1000)),
            Some(RestStage::Hidden)
        );
        assert_eq!(staging.stage(), RestStage::Hidden);
    }

    #[test]
    fn test_cancel_clears_pending() {
        let t0 = Instant::now();
        let mut staging = RestStaging::new();
        staging.enter(t0);
        staging.cancel();
        assert!(!staging.has_pending());
        assert_eq!(staging.poll(t0 + Duration::from_secs(10)), None);
        assert_eq!(staging.stage(), RestStage::Hidden);
    }

    #[test]
    fn test_exit_while_dimming_hides_immediately() {
        let t0 = Instant::now();
        let mut staging = RestStaging::new();
        staging.enter(t0);
        staging.exit(t0);
        assert_eq!(staging.stage(), RestStage::Hidden);
        assert!(!staging.has_pending());
    }

    #[test]
    fn test_visibility() {
        assert!(!RestStage::Hidden.is_visible());
        assert!(!RestStage::Dimming.is_visible());
        assert!(RestStage::Entering.is_visible());
        assert!(RestStage::Resting.is_visible());
        assert!(RestStage::Exiting.is_visible());
    }
}
