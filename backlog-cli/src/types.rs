// ABOUTME: Type definitions and enums for the bl command-line client
// ABOUTME: Classifies issue status names so tables and detail views can color them

use owo_colors::OwoColorize;
use std::fmt;

use crate::constants::{self, STATUS_ALIASES};

#[derive(Debug, Clone, PartialEq)]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Custom(String),
}

impl IssueStatus {
    /// Render `text` in this status's color
    pub fn paint(&self, text: &str, use_color: bool) -> String {
        if !use_color {
            return text.to_string();
        }

        match self {
            IssueStatus::Open => text.red().to_string(),
            IssueStatus::InProgress => text.blue().to_string(),
            IssueStatus::Resolved => text.yellow().to_string(),
            IssueStatus::Closed => text.green().to_string(),
            IssueStatus::Custom(_) => text.to_string(),
        }
    }
}

impl From<&str> for IssueStatus {
    fn from(s: &str) -> Self {
        match STATUS_ALIASES.get(s.trim().to_lowercase().as_str()) {
            Some(&constants::status::OPEN) => IssueStatus::Open,
            Some(&constants::status::IN_PROGRESS) => IssueStatus::InProgress,
            Some(&constants::status::RESOLVED) => IssueStatus::Resolved,
            Some(&constants::status::CLOSED) => IssueStatus::Closed,
            _ => IssueStatus::Custom(s.to_string()),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueStatus::Open => write!(f, "{}", constants::status::OPEN),
            IssueStatus::InProgress => write!(f, "{}", constants::status::IN_PROGRESS),
            IssueStatus::Resolved => write!(f, "{}", constants::status::RESOLVED),
            IssueStatus::Closed => write!(f, "{}", constants::status::CLOSED),
            IssueStatus::Custom(s) => write!(f, "{}", s),
        }
    }
}
