pub mod drag;
pub mod enums;
pub mod rest_stage;
pub mod settings;
pub mod task;
pub mod timer;
pub mod views;

pub use drag::{DragController, DropCommit, DropZone, HoverTarget, RowHit};
pub use enums::{Card, ListKind, SkipPolicy, TimerMode, TimerState, UiMode};
pub use rest_stage::{RestStage, RestStaging};
pub use settings::{Settings, SettingsError, SettingsForm};
pub use task::{move_across_lists, Task, TaskList};
pub use timer::{Durations, Timer, TimerEvent};
pub use views::{
    format_clock, session_ends_at, status_badge, task_glyph, task_label, tasks_blurred,
    window_title,
};
