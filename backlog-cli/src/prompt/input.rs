// ABOUTME: Single-line text input state machine with cursor editing and optional masking
// ABOUTME: Enter commits after validation, Esc or Ctrl-C cancels

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use owo_colors::OwoColorize;

use super::{PromptState, Transition};

/// Checks a submitted value; `Err` keeps the prompt open with the message shown
pub type Validator = dyn Fn(&str) -> Result<(), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    Plain,
    Masked,
}

const MASK: char = '*';

pub struct TextInput<'a> {
    prompt: String,
    placeholder: String,
    echo: Echo,
    buffer: Vec<char>,
    cursor: usize,
    validator: Option<&'a Validator>,
    error: Option<String>,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &str, placeholder: &str, echo: Echo) -> Self {
        Self {
            prompt: prompt.to_string(),
            placeholder: placeholder.to_string(),
            echo,
            buffer: Vec::new(),
            cursor: 0,
            validator: None,
            error: None,
        }
    }

    pub fn with_validator(mut self, validator: &'a Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn value(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn submit(&mut self) -> Transition<String> {
        let value = self.value();
        if let Some(validator) = self.validator {
            if let Err(message) = validator(&value) {
                self.error = Some(message);
                return Transition::Continue;
            }
        }
        Transition::Done(value)
    }

    fn shown(&self) -> Vec<char> {
        match self.echo {
            Echo::Plain => self.buffer.clone(),
            Echo::Masked => vec![MASK; self.buffer.len()],
        }
    }
}

impl PromptState for TextInput<'_> {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> Transition<String> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                return Transition::Cancelled;
            }
            (KeyCode::Enter, _) => return self.submit(),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.cursor = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.buffer.len();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            (KeyCode::Left, _) => self.cursor = self.cursor.saturating_sub(1),
            (KeyCode::Right, _) => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            (KeyCode::Char(c), modifiers)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            _ => return Transition::Continue,
        }

        self.error = None;
        Transition::Continue
    }

    fn render(&self, use_color: bool) -> String {
        let mut line = if use_color {
            format!("{} {} ", "?".green().bold(), self.prompt.bold())
        } else {
            format!("? {} ", self.prompt)
        };

        if self.buffer.is_empty() && !self.placeholder.is_empty() {
            if use_color {
                line.push_str(&self.placeholder.dimmed().to_string());
            } else {
                line.push_str(&self.placeholder);
            }
        } else {
            let shown = self.shown();
            let before: String = shown[..self.cursor].iter().collect();
            let at: String = shown.get(self.cursor).map_or(" ".to_string(), |c| c.to_string());
            let after: String = shown.iter().skip(self.cursor + 1).collect();
            line.push_str(&before);
            if use_color {
                line.push_str(&at.reversed().to_string());
            } else {
                line.push_str(&at);
            }
            line.push_str(&after);
        }

        if let Some(error) = &self.error {
            line.push('\n');
            if use_color {
                line.push_str(&format!("  {}", error.red()));
            } else {
                line.push_str(&format!("  {}", error));
            }
        }

        line
    }

    fn summary(&self, output: &String, use_color: bool) -> String {
        let shown = match self.echo {
            Echo::Plain => output.clone(),
            Echo::Masked if output.is_empty() => String::new(),
            // Fixed width so the key length is not revealed
            Echo::Masked => MASK.to_string().repeat(8),
        };

        if use_color {
            format!("{} {}", self.prompt.bold(), shown.cyan())
        } else {
            format!("{} {}", self.prompt, shown)
        }
    }
}
