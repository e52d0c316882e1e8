// ABOUTME: Keystroke-driven prompt engine for text input, list selection and confirmation
// ABOUTME: Each prompt is a pure state machine; a small runner feeds it keys and redraws it

mod confirm;
mod input;
mod select;
mod terminal;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::{cursor, queue, terminal as term};
use std::collections::VecDeque;
use std::io::{self, Write};

pub use confirm::ConfirmPrompt;
pub use input::{Echo, TextInput, Validator};
pub use select::ListSelect;
pub use terminal::{interactive_terminal, TerminalKeys};

/// Outcome of feeding one key to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<T> {
    Continue,
    Done(T),
    Cancelled,
}

pub trait PromptState {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Transition<Self::Output>;

    /// Current frame. Lines are separated by `\n`.
    fn render(&self, use_color: bool) -> String;

    /// One line left on screen once the prompt is answered
    fn summary(&self, output: &Self::Output, use_color: bool) -> String;
}

/// Somewhere key presses come from
pub trait KeySource {
    /// Next key press, or `None` when no more keys will arrive
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>>;

    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Drive `state` until it completes or is cancelled. `None` means cancelled;
/// an exhausted key source counts as cancellation.
pub fn run<S, K, W>(state: &mut S, keys: &mut K, out: &mut W, use_color: bool) -> io::Result<Option<S::Output>>
where
    S: PromptState,
    K: KeySource + ?Sized,
    W: Write,
{
    keys.begin()?;
    let result = drive(state, keys, out, use_color);
    let finished = keys.finish();
    let value = result?;
    finished?;
    Ok(value)
}

fn drive<S, K, W>(state: &mut S, keys: &mut K, out: &mut W, use_color: bool) -> io::Result<Option<S::Output>>
where
    S: PromptState,
    K: KeySource + ?Sized,
    W: Write,
{
    let mut drawn = draw(out, &state.render(use_color), 0)?;

    loop {
        let Some(key) = keys.next_key()? else {
            clear(out, drawn)?;
            return Ok(None);
        };

        match state.handle_key(key) {
            Transition::Continue => {
                drawn = draw(out, &state.render(use_color), drawn)?;
            }
            Transition::Done(value) => {
                clear(out, drawn)?;
                write!(out, "{}\r\n", state.summary(&value, use_color))?;
                out.flush()?;
                return Ok(Some(value));
            }
            Transition::Cancelled => {
                clear(out, drawn)?;
                return Ok(None);
            }
        }
    }
}

/// Replace the previous frame of `previous` lines with `frame`
fn draw<W: Write>(out: &mut W, frame: &str, previous: usize) -> io::Result<usize> {
    clear(out, previous)?;
    let lines: Vec<&str> = frame.split('\n').collect();
    write!(out, "{}", lines.join("\r\n"))?;
    out.flush()?;
    Ok(lines.len())
}

fn clear<W: Write>(out: &mut W, lines: usize) -> io::Result<()> {
    if lines == 0 {
        return Ok(());
    }
    if lines > 1 {
        queue!(out, cursor::MoveUp((lines - 1) as u16))?;
    }
    queue!(
        out,
        cursor::MoveToColumn(0),
        term::Clear(term::ClearType::FromCursorDown)
    )?;
    out.flush()
}

/// The prompts wizards need, independent of where keys come from
pub trait Prompter {
    /// Whether a person can answer prompts right now
    fn is_interactive(&self) -> bool;

    fn input(
        &mut self,
        prompt: &str,
        placeholder: &str,
        echo: Echo,
        validator: Option<&Validator>,
    ) -> Result<Option<String>>;

    /// Index into `items` of the chosen entry
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>>;

    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// [`Prompter`] backed by the real state machines over any key source
pub struct EventPrompter<K, W> {
    keys: K,
    out: W,
    use_color: bool,
    interactive: bool,
}

impl EventPrompter<TerminalKeys, io::Stderr> {
    /// Prompts on the controlling terminal, drawn on stderr
    pub fn terminal(use_color: bool) -> Self {
        Self {
            keys: TerminalKeys::new(),
            out: io::stderr(),
            use_color,
            interactive: interactive_terminal(),
        }
    }
}

impl EventPrompter<ScriptedKeys, io::Sink> {
    /// Prompts answered by a fixed key sequence, with output discarded
    pub fn scripted(keys: ScriptedKeys) -> Self {
        Self::new(keys, io::sink(), false)
    }
}

impl<K: KeySource, W: Write> EventPrompter<K, W> {
    pub fn new(keys: K, out: W, use_color: bool) -> Self {
        Self {
            keys,
            out,
            use_color,
            interactive: true,
        }
    }

    pub fn into_parts(self) -> (K, W) {
        (self.keys, self.out)
    }

    fn run_state<S: PromptState>(&mut self, state: &mut S) -> Result<Option<S::Output>> {
        Ok(run(state, &mut self.keys, &mut self.out, self.use_color)?)
    }
}

impl<K: KeySource, W: Write> Prompter for EventPrompter<K, W> {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn input(
        &mut self,
        prompt: &str,
        placeholder: &str,
        echo: Echo,
        validator: Option<&Validator>,
    ) -> Result<Option<String>> {
        let mut state = TextInput::new(prompt, placeholder, echo);
        if let Some(validator) = validator {
            state = state.with_validator(validator);
        }
        self.run_state(&mut state)
    }

    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        let mut state = ListSelect::new(title, items.to_vec());
        self.run_state(&mut state)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut state = ConfirmPrompt::new(question);
        Ok(self.run_state(&mut state)?.unwrap_or(false))
    }
}

/// A labelled value offered in a list prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Show `choices` as a list and return the value behind the chosen label
pub fn choose<T: Clone>(
    prompter: &mut dyn Prompter,
    title: &str,
    choices: &[Choice<T>],
) -> Result<Option<T>> {
    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
    Ok(prompter
        .select(title, &labels)?
        .and_then(|index| choices.get(index))
        .map(|choice| choice.value.clone()))
}

/// Replays a fixed sequence of key presses
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, code: KeyCode) -> Self {
        self.keys.push_back(KeyEvent::new(code, KeyModifiers::NONE));
        self
    }

    pub fn ctrl(mut self, c: char) -> Self {
        self.keys
            .push_back(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        for c in text.chars() {
            self = self.key(KeyCode::Char(c));
        }
        self
    }

    pub fn enter(self) -> Self {
        self.key(KeyCode::Enter)
    }

    pub fn esc(self) -> Self {
        self.key(KeyCode::Esc)
    }

    /// Type `text` and press Enter
    pub fn line(self, text: &str) -> Self {
        self.text(text).enter()
    }

    pub fn down(mut self, times: usize) -> Self {
        for _ in 0..times {
            self = self.key(KeyCode::Down);
        }
        self
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        Ok(self.keys.pop_front())
    }
}
