use super::enums::{SkipPolicy, TimerMode, TimerState};

/// Something that happened to the timer, handed to listeners by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Started(TimerMode),
    Paused(TimerMode),
    Resumed(TimerMode),
    Reset(TimerMode),
    /// The user skipped the rest of `from`
    Skipped { from: TimerMode, to: TimerMode },
    /// The countdown reached zero on its own
    Completed { finished: TimerMode, next: TimerMode },
}

impl TimerEvent {
    /// Mode the timer is in after this event
    pub fn mode_after(&self) -> TimerMode {
        match *self {
            Self::Started(m) | Self::Paused(m) | Self::Resumed(m) | Self::Reset(m) => m,
            Self::Skipped { to, .. } => to,
            Self::Completed { next, .. } => next,
        }
    }
}

/// Configured phase lengths, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub focus_secs: u32,
    pub rest_secs: u32,
}

impl Durations {
    pub fn from_minutes(focus: u32, rest: u32) -> Self {
        Self {
            focus_secs: focus * 60,
            rest_secs: rest * 60,
        }
    }

    pub fn for_mode(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_secs,
            TimerMode::Rest => self.rest_secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::from_minutes(25, 5)
    }
}

/// Pomodoro countdown: a focus/rest mode crossed with idle/running/paused
///
/// The timer never looks at the clock. The session calls [`Timer::tick`]
/// once per elapsed second while running (see `ticker::SecondTicker`).
#[derive(Debug, Clone)]
pub struct Timer {
    mode: TimerMode,
    state: TimerState,
    time_remaining: u32,
    /// Length of the phase in progress; only reset or a mode switch changes it
    phase_length: u32,
    durations: Durations,
    skip_policy: SkipPolicy,
}

impl Timer {
    pub fn new(durations: Durations, skip_policy: SkipPolicy) -> Self {
        Self {
            mode: TimerMode::Focus,
            state: TimerState::Idle,
            time_remaining: durations.focus_secs,
            phase_length: durations.focus_secs,
            durations,
            skip_policy,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Seconds left in the current phase
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        self.skip_policy
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Full length of the current phase
    pub fn phase_length(&self) -> u32 {
        self.phase_length
    }

    /// Fraction of the current phase already elapsed (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f64 {
        let total = self.phase_length();
        if total == 0 {
            return 1.0;
        }
        (1.0 - (self.time_remaining as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// idle -> running
    pub fn start(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Idle {
            return None;
        }
        self.state = TimerState::Running;
        Some(TimerEvent::Started(self.mode))
    }

    /// running -> paused, keeping the remaining time
    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(TimerEvent::Paused(self.mode))
    }

    /// paused -> running
    pub fn resume(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        Some(TimerEvent::Resumed(self.mode))
    }

    /// Single control: start when idle, pause when running, resume when paused
    pub fn toggle(&mut self) -> Option<TimerEvent> {
        match self.state {
            TimerState::Idle => self.start(),
            TimerState::Running => self.pause(),
            TimerState::Paused => self.resume(),
        }
    }

    /// Back to idle with the configured duration for the current mode
    pub fn reset(&mut self) -> TimerEvent {
        self.state = TimerState::Idle;
        self.restart_phase();
        TimerEvent::Reset(self.mode)
    }

    /// Abandon the current phase and switch to the other one
    pub fn skip(&mut self) -> TimerEvent {
        let from = self.mode;
        self.switch_mode();
        if self.skip_policy == SkipPolicy::AutoStart {
            self.state = TimerState::Running;
        }
        TimerEvent::Skipped { from, to: self.mode }
    }

    /// Count down one second; returns `Completed` when the phase runs out
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return None;
        }
        let finished = self.mode;
        self.switch_mode();
        Some(TimerEvent::Completed {
            finished,
            next: self.mode,
        })
    }

    /// Change phase lengths
    ///
    /// A session in progress (running or paused) keeps its remaining time;
    /// the new lengths take effect at the next reset or mode switch.
    pub fn set_durations(&mut self, durations: Durations) {
        self.durations = durations;
        if self.state == TimerState::Idle {
            self.restart_phase();
        }
    }

    pub fn set_skip_policy(&mut self, policy: SkipPolicy) {
        self.skip_policy = policy;
    }

    fn switch_mode(&mut self) {
        self.mode = self.mode.next();
        self.state = TimerState::Idle;
        self.restart_phase();
    }

    fn restart_phase(&mut self) {
        self.phase_length = self.durations.for_mode(self.mode);
        self.time_remaining = self.phase_length;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Durations::default(), SkipPolicy::default())
    }
}
