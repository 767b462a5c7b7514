use serde::{Deserialize, Serialize};

/// Pomodoro phase the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    Rest,
}

impl TimerMode {
    /// The phase that follows this one in the cycle
    pub fn next(&self) -> Self {
        match self {
            Self::Focus => Self::Rest,
            Self::Rest => Self::Focus,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::Rest => "Rest",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Focus => "🍅",
            Self::Rest => "☁️",
        }
    }
}

/// Runtime state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// What `skip` does with the next phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipPolicy {
    /// Next phase waits idle at full duration
    #[default]
    Idle,
    /// Next phase starts counting down immediately
    AutoStart,
}

impl SkipPolicy {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Idle => Self::AutoStart,
            Self::AutoStart => Self::Idle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "wait",
            Self::AutoStart => "auto-start",
        }
    }
}

/// Which task collection an item lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    Tasks,
    Backlog,
}

impl ListKind {
    /// The other collection (target of a keyboard transfer)
    pub fn other(&self) -> Self {
        match self {
            Self::Tasks => Self::Backlog,
            Self::Backlog => Self::Tasks,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Backlog => "Backlog",
        }
    }
}

/// Layout cards that the user can reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Card {
    Timer,
    Tasks,
    Backlog,
}

impl Card {
    /// Default left-to-right order
    pub fn default_order() -> Vec<Card> {
        vec![Card::Timer, Card::Tasks, Card::Backlog]
    }

    /// The task collection shown by this card, if any
    pub fn list(&self) -> Option<ListKind> {
        match self {
            Card::Timer => None,
            Card::Tasks => Some(ListKind::Tasks),
            Card::Backlog => Some(ListKind::Backlog),
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Locked,       // PIN entry required before any content is shown
    AddingTask,
    EditingTask,
    Settings,
    Security,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_mode_next() {
        assert_eq!(TimerMode::Focus.next(), TimerMode::Rest);
        assert_eq!(TimerMode::Rest.next(), TimerMode::Focus);
    }

    #[test]
    fn test_list_kind_other() {
        assert_eq!(ListKind::Tasks.other(), ListKind::Backlog);
        assert_eq!(ListKind::Backlog.other(), ListKind::Tasks);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&SkipPolicy::AutoStart).unwrap(), "\"autoStart\"");
        assert_eq!(serde_json::to_string(&Card::Backlog).unwrap(), "\"backlog\"");
        assert_eq!(serde_json::to_string(&TimerMode::Focus).unwrap(), "\"focus\"");
    }

    #[test]
    fn test_card_list() {
        assert_eq!(Card::Timer.list(), None);
        assert_eq!(Card::Tasks.list(), Some(ListKind::Tasks));
        assert_eq!(Card::Backlog.list(), Some(ListKind::Backlog));
    }
}
