//! Single-line text entry used to edit one setting.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use aws_control_core::settings::SettingField;

/// Longest value accepted for any setting.
pub const CHAR_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    Editing,
    Commit(String),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub field: SettingField,
    value: Vec<char>,
    /// Cursor position in characters
    cursor: usize,
}

impl TextInput {
    pub fn new(field: SettingField, initial: &str) -> Self {
        let value: Vec<char> = initial.chars().take(CHAR_LIMIT).collect();
        let cursor = value.len();
        Self {
            field,
            value,
            cursor,
        }
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) -> TextInputEvent {
        match key_event.code {
            KeyCode::Enter => return TextInputEvent::Commit(self.value().trim().to_string()),
            KeyCode::Esc => return TextInputEvent::Cancel,
            KeyCode::Char('u') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.value.len() < CHAR_LIMIT {
                    self.value.insert(self.cursor, c);
                    self.cursor += 1;
                }
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.value.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.value.len() => {
                self.value.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => {}
        }
        TextInputEvent::Editing
    }
}
