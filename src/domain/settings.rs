use super::enums::{Card, SkipPolicy};
use super::timer::Durations;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed range for focus and rest lengths, in minutes
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 99;

/// Validation failures for the settings form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} must be a whole number of minutes")]
    NotANumber { field: &'static str },
    #[error("{field} must be between 1 and 99 minutes (got {value})")]
    OutOfRange { field: &'static str, value: u32 },
    #[error("card order must list timer, tasks and backlog exactly once")]
    BadCardOrder,
}

/// User settings, stored as one encrypted object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub focus_minutes: u32,
    pub rest_minutes: u32,
    /// Hide task text while a focus session runs
    pub blur_mode: bool,
    /// Manual override of the automatic blur; cleared on mode change
    pub quick_blur: Option<bool>,
    pub card_order: Vec<Card>,
    pub skip_policy: SkipPolicy,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            rest_minutes: 5,
            blur_mode: false,
            quick_blur: None,
            card_order: Card::default_order(),
            skip_policy: SkipPolicy::Idle,
            notifications: true,
        }
    }
}

impl Settings {
    pub fn durations(&self) -> Durations {
        Durations::from_minutes(self.focus_minutes, self.rest_minutes)
    }

    /// Check every field; loaded settings that fail are replaced by defaults
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_minutes("Focus duration", self.focus_minutes)?;
        check_minutes("Rest duration", self.rest_minutes)?;

        let mut expected = Card::default_order();
        if self.card_order.len() != expected.len() {
            return Err(SettingsError::BadCardOrder);
        }
        expected.retain(|c| !self.card_order.contains(c));
        if !expected.is_empty() {
            return Err(SettingsError::BadCardOrder);
        }
        Ok(())
    }

    /// Move a card one slot left (negative) or right (positive)
    pub fn shift_card(&mut self, card: Card, delta: isize) {
        let Some(pos) = self.card_order.iter().position(|c| *c == card) else {
            return;
        };
        let target = pos as isize + delta;
        if target < 0 || target as usize >= self.card_order.len() {
            return;
        }
        self.card_order.swap(pos, target as usize);
    }
}

/// Parse a minutes field typed into the settings form
pub fn parse_minutes(field: &'static str, input: &str) -> Result<u32, SettingsError> {
    let value = input
        .trim()
        .parse::<u32>()
        .map_err(|_| SettingsError::NotANumber { field })?;
    check_minutes(field, value)?;
    Ok(value)
}

fn check_minutes(field: &'static str, value: u32) -> Result<(), SettingsError> {
    if (MIN_MINUTES..=MAX_MINUTES).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange { field, value })
    }
}

/// Editable copy of the settings shown in the settings modal
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub focus: String,
    pub rest: String,
    pub blur_mode: bool,
    pub skip_policy: SkipPolicy,
    pub notifications: bool,
    pub editing_field: usize, // 0 = focus, 1 = rest, 2 = blur, 3 = skip, 4 = notifications
    pub error: Option<SettingsError>,
}

impl SettingsForm {
    pub const FIELD_COUNT: usize = 5;

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            focus: settings.focus_minutes.to_string(),
            rest: settings.rest_minutes.to_string(),
            blur_mode: settings.blur_mode,
            skip_policy: settings.skip_policy,
            notifications: settings.notifications,
            editing_field: 0,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.editing_field = (self.editing_field + 1) % Self::FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.editing_field = (self.editing_field + Self::FIELD_COUNT - 1) % Self::FIELD_COUNT;
    }

    /// Type a character into the focused field
    pub fn add_char(&mut self, c: char) {
        match self.editing_field {
            0 if c.is_ascii_digit() => self.focus.push(c),
            1 if c.is_ascii_digit() => self.rest.push(c),
            2 if c == ' ' => self.blur_mode = !self.blur_mode,
            3 if c == ' ' => self.skip_policy = self.skip_policy.toggled(),
            4 if c == ' ' => self.notifications = !self.notifications,
            _ => {}
        }
        self.error = self.check().err();
    }

    pub fn backspace(&mut self) {
        match self.editing_field {
            0 => {
                self.focus.pop();
            }
            1 => {
                self.rest.pop();
            }
            _ => {}
        }
        self.error = self.check().err();
    }

    fn check(&self) -> Result<(u32, u32), SettingsError> {
        let focus = parse_minutes("Focus duration", &self.focus)?;
        let rest = parse_minutes("Rest duration", &self.rest)?;
        Ok((focus, rest))
    }

    /// Produce updated settings, or the first validation error
    pub fn apply(&self, current: &Settings) -> Result<Settings, SettingsError> {
        let (focus_minutes, rest_minutes) = self.check()?;
        Ok(Settings {
            focus_minutes,
            rest_minutes,
            blur_mode: self.blur_mode,
            skip_policy: self.skip_policy,
            notifications: self.notifications,
            ..current.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_parse_minutes_bounds() {
        assert_eq!(parse_minutes("Focus duration", "1"), Ok(1));
        assert_eq!(parse_minutes("Focus duration", " 99 "), Ok(99));
        assert_eq!(
            parse_minutes("Focus duration", "0"),
            Err(SettingsError::OutOfRange {
                field: "Focus duration",
                value: 0
            })
        );
        assert_eq!(
            parse_minutes("Rest duration", "100"),
            Err(SettingsError::OutOfRange {
                field: "Rest duration",
                value: 100
            })
        );
        assert_eq!(
            parse_minutes("Rest duration", ""),
            Err(SettingsError::NotANumber {
                field: "Rest duration"
            })
        );
    }

    #[test]
    fn test_error_message_is_readable() {
        let err = parse_minutes("Focus duration", "120").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Focus duration must be between 1 and 99 minutes (got 120)"
        );
    }

    #[test]
    fn test_form_blocks_invalid_save() {
        let current = Settings::default();
        let mut form = SettingsForm::from_settings(&current);
        form.add_char('0'); // "250"
        assert!(form.error.is_some());
        assert!(form.apply(&current).is_err());

        form.backspace();
        assert!(form.error.is_none());
        assert_eq!(form.apply(&current).unwrap().focus_minutes, 25);
    }

    #[test]
    fn test_form_apply_updates_fields() {
        let current = Settings::default();
        let mut form = SettingsForm::from_settings(&current);
        form.backspace();
        form.backspace();
        form.add_char('4');
        form.add_char('5');
        form.next_field();
        form.next_field();
        form.add_char(' ');
        form.next_field();
        form.add_char(' ');

        let updated = form.apply(&current).unwrap();
        assert_eq!(updated.focus_minutes, 45);
        assert_eq!(updated.rest_minutes, 5);
        assert!(updated.blur_mode);
        assert_eq!(updated.skip_policy, SkipPolicy::AutoStart);
        assert_eq!(updated.card_order, current.card_order);
    }

    #[test]
    fn test_form_ignores_letters_in_minutes() {
        let current = Settings::default();
        let mut form = SettingsForm::from_settings(&current);
        form.add_char('x');
        assert_eq!(form.focus, "25");
    }

    #[test]
    fn test_validate_rejects_bad_card_order() {
        let mut settings = Settings::default();
        settings.card_order = vec![Card::Timer, Card::Timer, Card::Tasks];
        assert_eq!(settings.validate(), Err(SettingsError::BadCardOrder));

        settings.card_order = vec![Card::Timer];
        assert_eq!(settings.validate(), Err(SettingsError::BadCardOrder));
    }

    #[test]
    fn test_shift_card() {
        let mut settings = Settings::default();
        settings.shift_card(Card::Backlog, -1);
        assert_eq!(settings.card_order, vec![Card::Timer, Card::Backlog, Card::Tasks]);

        // Already at the edge
        settings.shift_card(Card::Timer, -1);
        assert_eq!(settings.card_order, vec![Card::Timer, Card::Backlog, Card::Tasks]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"focusMinutes": 40}"#).unwrap();
        assert_eq!(settings.focus_minutes, 40);
        assert_eq!(settings.rest_minutes, 5);
        assert_eq!(settings.card_order, Card::default_order());
    }
}
