// ABOUTME: Filterable single-choice list state machine
// ABOUTME: Typing narrows the list by case-insensitive substring; Enter returns the original index

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use owo_colors::OwoColorize;

use super::{PromptState, Transition};
use crate::constants::ui::SELECT_WINDOW;

pub struct ListSelect {
    title: String,
    items: Vec<String>,
    filter: String,
    /// Indices into `items` that match the filter, in original order
    visible: Vec<usize>,
    highlight: usize,
}

impl ListSelect {
    pub fn new(title: &str, items: Vec<String>) -> Self {
        let visible = (0..items.len()).collect();
        Self {
            title: title.to_string(),
            items,
            filter: String::new(),
            visible,
            highlight: 0,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    fn last(&self) -> usize {
        self.visible.len().saturating_sub(1)
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, label)| label.to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect();
        self.highlight = self.highlight.min(self.last());
    }

    /// First visible row of the window that keeps the highlight on screen
    fn window_start(&self) -> usize {
        if self.highlight >= SELECT_WINDOW {
            self.highlight + 1 - SELECT_WINDOW
        } else {
            0
        }
    }
}

impl PromptState for ListSelect {
    type Output = usize;

    fn handle_key(&mut self, key: KeyEvent) -> Transition<usize> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                return Transition::Cancelled;
            }
            (KeyCode::Enter, _) => {
                return match self.visible.get(self.highlight) {
                    Some(&index) => Transition::Done(index),
                    None => Transition::Continue,
                };
            }
            (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                self.highlight = self.highlight.saturating_sub(1);
            }
            (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                self.highlight = (self.highlight + 1).min(self.last());
            }
            (KeyCode::PageUp, _) => {
                self.highlight = self.highlight.saturating_sub(SELECT_WINDOW);
            }
            (KeyCode::PageDown, _) => {
                self.highlight = (self.highlight + SELECT_WINDOW).min(self.last());
            }
            (KeyCode::Home, _) => self.highlight = 0,
            (KeyCode::End, _) => self.highlight = self.last(),
            (KeyCode::Backspace, _) => {
                if self.filter.pop().is_some() {
                    self.refilter();
                }
            }
            (KeyCode::Char(c), modifiers)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.filter.push(c);
                self.refilter();
            }
            _ => {}
        }

        Transition::Continue
    }

    fn render(&self, use_color: bool) -> String {
        let mut lines = Vec::new();

        let header = if use_color {
            format!("{} {} {}", "?".green().bold(), self.title.bold(), self.filter.cyan())
        } else {
            format!("? {} {}", self.title, self.filter)
        };
        lines.push(header.trim_end().to_string());

        if self.visible.is_empty() {
            let empty = "  No matches";
            lines.push(if use_color {
                empty.dimmed().to_string()
            } else {
                empty.to_string()
            });
        }

        let start = self.window_start();
        for (row, &index) in self
            .visible
            .iter()
            .enumerate()
            .skip(start)
            .take(SELECT_WINDOW)
        {
            let label = &self.items[index];
            lines.push(match (row == self.highlight, use_color) {
                (true, true) => format!("{}", format!("> {}", label).cyan()),
                (true, false) => format!("> {}", label),
                (false, _) => format!("  {}", label),
            });
        }

        let hint = "  ↑/↓ move, type to filter, enter to select, esc to cancel";
        lines.push(if use_color {
            hint.dimmed().to_string()
        } else {
            hint.to_string()
        });

        lines.join("\n")
    }

    fn summary(&self, output: &usize, use_color: bool) -> String {
        let label = self
            .items
            .get(*output)
            .map(String::as_str)
            .unwrap_or_default();
        if use_color {
            format!("{} {}", self.title.bold(), label.cyan())
        } else {
            format!("{} {}", self.title, label)
        }
    }
}
