// ABOUTME: Key source reading crossterm events from the controlling terminal in raw mode
// ABOUTME: Raw mode and cursor visibility are restored on every exit path

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use std::io::{self, IsTerminal};

use super::KeySource;
use crate::constants::CI_ENV_VARS;

/// Whether prompts can be shown: stdin is a terminal and no CI runner is detected
pub fn interactive_terminal() -> bool {
    io::stdin().is_terminal() && !in_ci()
}

fn in_ci() -> bool {
    CI_ENV_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

#[derive(Debug, Default)]
pub struct TerminalKeys {
    raw: bool,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self::default()
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.raw {
            self.raw = false;
            terminal::disable_raw_mode()?;
            execute!(io::stderr(), cursor::Show)?;
        }
        Ok(())
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        loop {
            // Release and repeat events are reported on some platforms
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
    }

    fn begin(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.raw = true;
        execute!(io::stderr(), cursor::Hide)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.restore()
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::debug!("Failed to restore terminal: {}", err);
        }
    }
}
