// ABOUTME: Multi-step flows that turn flags or prompt answers into Backlog requests
// ABOUTME: Covers login, issue creation and issue editing; cancelling any step has no side effects

mod create;
mod edit;
mod login;

use anyhow::Result;
use backlog_sdk::{BacklogError, Resource};
use chrono::NaiveDate;

use crate::constants::dates::DUE_DATE_FORMAT;
use crate::constants::ui::CURRENT_MARKER;
use crate::prompt::{Choice, Prompter};

pub use create::{create_issue, CreateOptions};
pub use edit::{edit_issue, EditOptions};
pub use login::login;

/// How a flow ended. Cancellation is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<T> {
    Completed(T),
    Cancelled,
}

impl<T> Flow<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Flow::Cancelled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Flow::Completed(value) => Some(value),
            Flow::Cancelled => None,
        }
    }
}

/// Leave the enclosing flow as cancelled when a prompt was abandoned
macro_rules! answer_or_cancel {
    ($prompt:expr) => {
        match $prompt {
            Some(value) => value,
            None => return Ok($crate::wizard::Flow::Cancelled),
        }
    };
}
pub(crate) use answer_or_cancel;

/// Check a `yyyy-MM-dd` date and return it normalized
pub fn parse_due_date(raw: &str) -> Result<String, BacklogError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT)
        .map(|date| date.format(DUE_DATE_FORMAT).to_string())
        .map_err(|_| {
            BacklogError::invalid_input(format!(
                "Invalid due date '{}'. Use yyyy-MM-dd",
                trimmed
            ))
        })
}

/// Prompt validator accepting an empty answer or a valid due date
pub(crate) fn optional_due_date(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Ok(());
    }
    parse_due_date(value).map(|_| ()).map_err(|_| "Use yyyy-MM-dd".to_string())
}

pub(crate) fn require_interactive(prompter: &dyn Prompter, hint: &str) -> Result<()> {
    if prompter.is_interactive() {
        Ok(())
    } else {
        Err(BacklogError::invalid_input(format!(
            "Interactive prompts need a terminal. {}",
            hint
        ))
        .into())
    }
}

/// One choice per resource, marking the one the issue currently has
pub(crate) fn resource_choices<R: Resource>(
    resources: &[R],
    current: &[i64],
) -> Vec<Choice<i64>> {
    resources
        .iter()
        .map(|resource| {
            let mut label = resource.name().to_string();
            if current.contains(&resource.id()) {
                label.push_str(CURRENT_MARKER);
            }
            Choice::new(label, resource.id())
        })
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
