use crate::domain::{
    move_across_lists, tasks_blurred, Card, DragController, DropCommit, DropZone, ListKind,
    RestStaging, Settings, SettingsForm, Task, TaskList, Timer, TimerEvent, TimerMode, TimerState,
    UiMode,
};
use crate::notifications;
use crate::persistence::{EncryptedStore, SecurityError};
use crate::ticker::SecondTicker;
use anyhow::Result;
use chrono::NaiveDate;
use std::time::Instant;
use uuid::Uuid;

/// How many deletes can be undone
pub const UNDO_LIMIT: usize = 10;

/// Input form state for adding or editing a task
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub text: String,
    pub list: ListKind,
    pub editing: Option<Uuid>, // None = adding a new task
}

impl InputFormState {
    /// Blank input keeps the submit action disabled
    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// What a PIN prompt is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPurpose {
    Unlock,
    SetPin,
}

#[derive(Debug, Clone)]
pub struct PinPrompt {
    pub purpose: PinPurpose,
    pub input: String,
    pub error: Option<String>,
}

impl PinPrompt {
    fn new(purpose: PinPurpose) -> Self {
        Self {
            purpose,
            input: String::new(),
            error: None,
        }
    }
}

/// A deleted task and where it sat, so it can be put back
#[derive(Debug, Clone)]
pub struct UndoAction {
    pub list: ListKind,
    pub task: Task,
    pub before: Option<Uuid>,
}

/// Main application state
pub struct AppState {
    pub store: EncryptedStore,
    pub timer: Timer,
    pub tasks: TaskList,
    pub backlog: TaskList,
    pub settings: Settings,
    pub focused: ListKind,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub settings_form: Option<SettingsForm>,
    pub pin_prompt: Option<PinPrompt>,
    pub status_message: Option<String>,
    pub undo_stack: Vec<UndoAction>,
    pub needs_save: bool,

    // Mouse drag state and the hit areas drawn in the last frame
    pub drag: DragController,
    pub drop_zones: Vec<DropZone>,

    pub rest: RestStaging,
    pub ticker: SecondTicker,

    // Focus sessions that ran to zero today
    pub completed_focus_sessions: u32,
    pub stats_date: NaiveDate,

    // Animation frame counter for the rest overlay (increments every tick)
    pub animation_frame: u32,
}

impl AppState {
    pub fn new(store: EncryptedStore) -> Self {
        let locked = store.is_locked();
        let mut app = Self {
            store,
            timer: Timer::default(),
            tasks: TaskList::new(),
            backlog: TaskList::new(),
            settings: Settings::default(),
            focused: ListKind::Tasks,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            settings_form: None,
            pin_prompt: None,
            status_message: None,
            undo_stack: Vec::new(),
            needs_save: false,
            drag: DragController::new(),
            drop_zones: Vec::new(),
            rest: RestStaging::new(),
            ticker: SecondTicker::new(),
            completed_focus_sessions: 0,
            stats_date: chrono::Local::now().date_naive(),
            animation_frame: 0,
        };

        if locked {
            app.ui_mode = UiMode::Locked;
            app.pin_prompt = Some(PinPrompt::new(PinPurpose::Unlock));
        } else {
            app.load_from_store();
        }
        app
    }

    /// Replace in-memory data with what the store holds
    fn load_from_store(&mut self) {
        self.tasks = self.store.load_list(ListKind::Tasks);
        self.backlog = self.store.load_list(ListKind::Backlog);
        self.settings = self.store.load_settings();
        self.timer = Timer::new(self.settings.durations(), self.settings.skip_policy);
        self.selected_index = 0;
        tracing::info!(
            tasks = self.tasks.len(),
            backlog = self.backlog.len(),
            "loaded stored data"
        );
    }

    pub fn list(&self, kind: ListKind) -> &TaskList {
        match kind {
            ListKind::Tasks => &self.tasks,
            ListKind::Backlog => &self.backlog,
        }
    }

    pub fn list_mut(&mut self, kind: ListKind) -> &mut TaskList {
        match kind {
            ListKind::Tasks => &mut self.tasks,
            ListKind::Backlog => &mut self.backlog,
        }
    }

    /// Source and destination lists borrowed together
    fn list_pair(&mut self, from: ListKind) -> (&mut TaskList, &mut TaskList) {
        match from {
            ListKind::Tasks => (&mut self.tasks, &mut self.backlog),
            ListKind::Backlog => (&mut self.backlog, &mut self.tasks),
        }
    }

    pub fn tasks_blurred(&self) -> bool {
        tasks_blurred(&self.settings, &self.timer)
    }

    /// Id of the selected task in the focused list (display order)
    pub fn selected_id(&self) -> Option<Uuid> {
        self.list(self.focused)
            .sorted_for_display()
            .get(self.selected_index)
            .map(|t| t.id)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        let len = self.list(self.focused).len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move keyboard focus to the other list
    pub fn switch_focus(&mut self) {
        self.focused = self.focused.other();
        self.clamp_selection();
    }

    /// Focus a specific task, e.g. after a click
    pub fn select(&mut self, list: ListKind, id: Uuid) {
        self.focused = list;
        if let Some(index) = self.list(list).display_index(id) {
            self.selected_index = index;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.list(self.focused).len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Start adding a new task to the focused list (opens input form)
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState {
            text: String::new(),
            list: self.focused,
            editing: None,
        });
        self.ui_mode = UiMode::AddingTask;
    }

    /// Start editing the selected task's text
    pub fn start_edit_task(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(task) = self.list(self.focused).get(id) else {
            return;
        };
        self.input_form = Some(InputFormState {
            text: task.text.clone(),
            list: self.focused,
            editing: Some(id),
        });
        self.ui_mode = UiMode::EditingTask;
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.text.push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.text.pop();
        }
    }

    /// Submit input form; blank input leaves the form open
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };
        if !form.can_submit() {
            self.input_form = Some(form);
            return;
        }

        match form.editing {
            Some(id) => {
                if self.list_mut(form.list).edit(id, &form.text) {
                    self.needs_save = true;
                }
            }
            None => {
                if let Some(id) = self.add_task(form.list, &form.text) {
                    tracing::debug!(list = ?form.list, %id, "task added");
                    self.select(form.list, id);
                }
            }
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Append a task to `list`; blank text adds nothing
    pub fn add_task(&mut self, list: ListKind, text: &str) -> Option<Uuid> {
        let id = self.list_mut(list).add(text)?;
        self.needs_save = true;
        Some(id)
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.list_mut(self.focused).toggle_complete(id).is_some() {
            // Keep the cursor on the same task after it moves between groups
            self.select(self.focused, id);
            self.needs_save = true;
        }
    }

    /// Delete the selected task, remembering it for undo
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let list = self.focused;
        let before = self.list(list).sorted_for_display().get(self.selected_index + 1).map(|t| t.id);

        if let Some(task) = self.list_mut(list).delete(id) {
            self.undo_stack.push(UndoAction { list, task, before });
            if self.undo_stack.len() > UNDO_LIMIT {
                self.undo_stack.remove(0);
            }
            self.clamp_selection();
            self.needs_save = true;
        }
    }

    /// Restore the most recently deleted task
    pub fn undo(&mut self) {
        if let Some(action) = self.undo_stack.pop() {
            let id = action.task.id;
            self.list_mut(action.list).insert_before(action.task, action.before);
            self.select(action.list, id);
            self.needs_save = true;
        }
    }

    pub fn move_selected_up(&mut self) {
        if self.selected_index == 0 {
            return;
        }
        self.move_selected_to(self.selected_index - 1);
    }

    pub fn move_selected_down(&mut self) {
        self.move_selected_to(self.selected_index + 1);
    }

    fn move_selected_to(&mut self, new_index: usize) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if new_index >= self.list(self.focused).len() {
            return;
        }
        if self.list_mut(self.focused).reorder(id, new_index) {
            self.select(self.focused, id);
            self.needs_save = true;
        }
    }

    /// Send the selected task to the end of the other list
    pub fn send_selected_to_other_list(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let from = self.focused;
        let (source, dest) = self.list_pair(from);
        if move_across_lists(id, source, dest, None) {
            tracing::debug!(%id, from = ?from, "task moved to other list");
            self.clamp_selection();
            self.needs_save = true;
        }
    }

    /// Apply the result of a finished mouse drag
    pub fn apply_drop(&mut self, commit: DropCommit) {
        match commit {
            DropCommit::Reorder { list, id, new_index } => {
                if self.list_mut(list).reorder(id, new_index) {
                    self.select(list, id);
                    self.needs_save = true;
                }
            }
            DropCommit::Transfer {
                from,
                to,
                id,
                insert_before,
            } => {
                debug_assert_eq!(from.other(), to);
                let (source, dest) = self.list_pair(from);
                if move_across_lists(id, source, dest, insert_before) {
                    self.select(to, id);
                    self.needs_save = true;
                }
            }
        }
    }

    /// Start, pause or resume depending on the timer state
    pub fn toggle_timer(&mut self, now: Instant) {
        if let Some(event) = self.timer.toggle() {
            self.dispatch(event, now);
        }
    }

    pub fn reset_timer(&mut self, now: Instant) {
        let event = self.timer.reset();
        self.dispatch(event, now);
    }

    pub fn skip_timer(&mut self, now: Instant) {
        let event = self.timer.skip();
        self.dispatch(event, now);
    }

    /// Flip the blur override for the current focus session
    pub fn toggle_quick_blur(&mut self) {
        if self.timer.mode() != TimerMode::Focus || self.timer.state() == TimerState::Idle {
            return;
        }
        self.settings.quick_blur = Some(!self.tasks_blurred());
        self.needs_save = true;
    }

    /// Hand a timer event to every listener
    fn dispatch(&mut self, event: TimerEvent, now: Instant) {
        tracing::info!(
            ?event,
            mode = event.mode_after().name(),
            remaining = self.timer.time_remaining(),
            "timer event"
        );

        // Countdown schedule follows the running state
        if self.timer.is_running() {
            if !self.ticker.is_active() || matches!(event, TimerEvent::Skipped { .. }) {
                self.ticker.start(now);
            }
        } else {
            self.ticker.stop();
        }

        match event {
            TimerEvent::Skipped { from, to } => {
                self.on_mode_change();
                match (from, to) {
                    // Leaving rest early drops the overlay without the exit sequence
                    (TimerMode::Rest, _) => self.rest.cancel(),
                    (_, TimerMode::Rest) => self.rest.enter(now),
                    _ => {}
                }
            }
            TimerEvent::Completed { finished, next } => {
                if finished == TimerMode::Focus {
                    self.completed_focus_sessions += 1;
                }
                if self.settings.notifications {
                    notifications::notify_session_complete(finished, next);
                }
                self.on_mode_change();
                match next {
                    TimerMode::Rest => self.rest.enter(now),
                    TimerMode::Focus => self.rest.exit(now),
                }
            }
            TimerEvent::Started(_)
            | TimerEvent::Paused(_)
            | TimerEvent::Resumed(_)
            | TimerEvent::Reset(_) => {}
        }
    }

    fn on_mode_change(&mut self) {
        // Quick blur only lasts for the session it was set in
        if self.settings.quick_blur.take().is_some() {
            self.needs_save = true;
        }
    }

    /// Advance the countdown and the rest staging
    pub fn tick(&mut self, now: Instant) {
        let due = self.ticker.due_ticks(now);
        for _ in 0..due {
            if let Some(event) = self.timer.tick() {
                self.dispatch(event, now);
                break;
            }
        }

        if let Some(stage) = self.rest.poll(now) {
            tracing::debug!(?stage, "rest stage");
        }

        let today = chrono::Local::now().date_naive();
        if today != self.stats_date {
            self.stats_date = today;
            self.completed_focus_sessions = 0;
        }

        // Increment animation frame counter (wraps at u32::MAX)
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    pub fn open_settings(&mut self) {
        self.settings_form = Some(SettingsForm::from_settings(&self.settings));
        self.ui_mode = UiMode::Settings;
    }

    pub fn cancel_settings(&mut self) {
        self.settings_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Validate and apply the settings form; invalid input keeps it open with an error
    pub fn submit_settings(&mut self) {
        let result = match &self.settings_form {
            Some(form) => form.apply(&self.settings),
            None => return,
        };
        match result {
            Ok(settings) => {
                self.timer.set_durations(settings.durations());
                self.timer.set_skip_policy(settings.skip_policy);
                self.settings = settings;
                self.settings_form = None;
                self.ui_mode = UiMode::Normal;
                self.needs_save = true;
                tracing::info!(
                    focus = self.settings.focus_minutes,
                    rest = self.settings.rest_minutes,
                    "settings saved"
                );
            }
            Err(e) => {
                tracing::debug!(error = %e, "settings rejected");
                if let Some(form) = &mut self.settings_form {
                    form.error = Some(e);
                }
            }
        }
    }

    /// Move the focused list's card one slot left or right
    pub fn shift_focused_card(&mut self, delta: isize) {
        let card = match self.focused {
            ListKind::Tasks => Card::Tasks,
            ListKind::Backlog => Card::Backlog,
        };
        self.settings.shift_card(card, delta);
        self.needs_save = true;
    }

    pub fn open_security(&mut self) {
        self.ui_mode = UiMode::Security;
    }

    pub fn close_security(&mut self) {
        self.pin_prompt = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Begin choosing a new PIN
    pub fn start_set_pin(&mut self) {
        self.pin_prompt = Some(PinPrompt::new(PinPurpose::SetPin));
    }

    /// Drop PIN protection in favour of a device key
    pub fn use_auto_key(&mut self) {
        let result = self.save().and_then(|_| self.store.use_auto_key());
        match result {
            Ok(()) => self.status_message = Some("PIN removed, using device key".to_string()),
            Err(e) => {
                tracing::error!(error = %e, "switching to auto key failed");
                self.status_message = Some(format!("Could not switch key: {}", e));
            }
        }
        self.close_security();
    }

    pub fn pin_add_char(&mut self, c: char) {
        if let Some(prompt) = &mut self.pin_prompt {
            if c.is_ascii_digit() && prompt.input.len() < crate::persistence::security::MAX_PIN_LEN {
                prompt.input.push(c);
                prompt.error = None;
            }
        }
    }

    pub fn pin_backspace(&mut self) {
        if let Some(prompt) = &mut self.pin_prompt {
            prompt.input.pop();
        }
    }

    pub fn submit_pin(&mut self) {
        let Some(prompt) = self.pin_prompt.take() else {
            return;
        };

        match prompt.purpose {
            PinPurpose::Unlock => match self.store.unlock(&prompt.input) {
                Ok(()) => {
                    self.load_from_store();
                    self.ui_mode = UiMode::Normal;
                }
                Err(e) => {
                    if matches!(e, SecurityError::WrongPin) {
                        tracing::warn!("wrong PIN entered");
                    }
                    self.pin_prompt = Some(PinPrompt {
                        error: Some(e.to_string()),
                        input: String::new(),
                        ..prompt
                    });
                }
            },
            PinPurpose::SetPin => {
                if let Err(e) = crate::persistence::validate_pin(&prompt.input) {
                    self.pin_prompt = Some(PinPrompt {
                        error: Some(e.to_string()),
                        ..prompt
                    });
                    return;
                }
                let result = self.save().and_then(|_| self.store.set_pin(&prompt.input));
                match result {
                    Ok(()) => self.status_message = Some("PIN set".to_string()),
                    Err(e) => {
                        tracing::error!(error = %e, "setting PIN failed");
                        self.status_message = Some(format!("Could not set PIN: {}", e));
                    }
                }
                self.close_security();
            }
        }
    }

    /// Save state to the encrypted store
    pub fn save(&mut self) -> Result<()> {
        if self.store.is_locked() {
            return Ok(());
        }
        self.store.save_list(ListKind::Tasks, &self.tasks)?;
        self.store.save_list(ListKind::Backlog, &self.backlog)?;
        self.store.save_settings(&self.settings)?;
        self.needs_save = false;
        Ok(())
    }

    /// Tear down pending work before exit
    pub fn shutdown(&mut self) -> Result<()> {
        self.rest.cancel();
        self.drag.cancel();
        self.ticker.stop();
        if self.needs_save {
            self.save()?;
        }
        Ok(())
    }
}
