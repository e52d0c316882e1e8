// ABOUTME: Yes/no confirmation state machine defaulting to no
// ABOUTME: Only y or Y confirms; Enter, n, q, Esc and Ctrl-C all decline

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use owo_colors::OwoColorize;

use super::{PromptState, Transition};

pub struct ConfirmPrompt {
    question: String,
}

impl ConfirmPrompt {
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
        }
    }
}

impl PromptState for ConfirmPrompt {
    type Output = bool;

    fn handle_key(&mut self, key: KeyEvent) -> Transition<bool> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Transition::Done(false),
            (KeyCode::Char('y' | 'Y'), _) => Transition::Done(true),
            (KeyCode::Char('n' | 'N' | 'q'), _) | (KeyCode::Esc, _) | (KeyCode::Enter, _) => {
                Transition::Done(false)
            }
            _ => Transition::Continue,
        }
    }

    fn render(&self, use_color: bool) -> String {
        if use_color {
            format!(
                "{} {} {}",
                "?".green().bold(),
                self.question.bold(),
                "(y/N)".dimmed()
            )
        } else {
            format!("? {} (y/N)", self.question)
        }
    }

    fn summary(&self, output: &bool, use_color: bool) -> String {
        let answer = if *output { "yes" } else { "no" };
        if use_color {
            format!("{} {}", self.question.bold(), answer.cyan())
        } else {
            format!("{} {}", self.question, answer)
        }
    }
}
