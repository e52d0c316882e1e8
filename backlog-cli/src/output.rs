// ABOUTME: This module handles output formatting for the bl command-line client
// ABOUTME: Tables, detail views and JSON for issues, projects and comments

use anyhow::Result;
use backlog_sdk::{Comment, Issue, Project};
use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::constants::dates::TIMESTAMP_DISPLAY_FORMAT;
use crate::constants::ui::{SUMMARY_WIDTH, UNASSIGNED};
use crate::types::IssueStatus;

pub trait OutputFormat {
    fn format_issues(&self, issues: &[Issue]) -> Result<String>;
    fn format_issue(&self, issue: &Issue, url: &str) -> Result<String>;
    fn format_projects(&self, projects: &[Project]) -> Result<String>;
    fn format_comments(&self, comments: &[Comment]) -> Result<String>;
}

pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Shorten to `max_len` characters, never splitting a multi-byte character
    fn truncate_summary(summary: &str, max_len: usize) -> String {
        if summary.chars().count() <= max_len {
            summary.to_string()
        } else {
            let kept: String = summary.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }

    fn format_status(&self, issue: &Issue) -> String {
        match &issue.status {
            Some(status) => IssueStatus::from(status.name.as_str()).paint(&status.name, self.use_color),
            None => "-".to_string(),
        }
    }

    fn format_assignee(&self, issue: &Issue) -> String {
        match &issue.assignee {
            Some(user) => user.name.clone(),
            None if self.use_color => UNASSIGNED.dimmed().to_string(),
            None => UNASSIGNED.to_string(),
        }
    }

    fn label(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render an API timestamp in local time, falling back to the raw text
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| {
            ts.with_timezone(&Local)
                .format(TIMESTAMP_DISPLAY_FORMAT)
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

fn names<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormat for JsonFormatter {
    fn format_issues(&self, issues: &[Issue]) -> Result<String> {
        self.render(issues)
    }

    fn format_issue(&self, issue: &Issue, _url: &str) -> Result<String> {
        self.render(issue)
    }

    fn format_projects(&self, projects: &[Project]) -> Result<String> {
        self.render(projects)
    }

    fn format_comments(&self, comments: &[Comment]) -> Result<String> {
        self.render(comments)
    }
}

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl OutputFormat for TableFormatter {
    fn format_issues(&self, issues: &[Issue]) -> Result<String> {
        let rows: Vec<IssueRow> = issues
            .iter()
            .map(|issue| IssueRow {
                key: issue.issue_key.clone(),
                status: self.format_status(issue),
                assignee: self.format_assignee(issue),
                summary: Self::truncate_summary(&issue.summary, SUMMARY_WIDTH),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(table.to_string())
    }

    fn format_issue(&self, issue: &Issue, url: &str) -> Result<String> {
        let mut lines = Vec::new();

        let key = if self.use_color {
            issue.issue_key.bold().to_string()
        } else {
            issue.issue_key.clone()
        };
        lines.push(format!("{} {}", key, issue.summary));
        lines.push(String::new());

        let fields = [
            ("Status", self.format_status(issue)),
            (
                "Type",
                names(issue.issue_type.iter().map(|t| t.name.as_str())),
            ),
            (
                "Priority",
                names(issue.priority.iter().map(|p| p.name.as_str())),
            ),
            ("Assignee", self.format_assignee(issue)),
            (
                "Due date",
                issue
                    .due_date
                    .as_deref()
                    .map(|d| d.get(..10).unwrap_or(d).to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "Milestones",
                names(issue.milestone.iter().map(|m| m.name.as_str())),
            ),
            (
                "Categories",
                names(issue.category.iter().map(|c| c.name.as_str())),
            ),
        ];
        for (name, value) in fields {
            let label = format!("{}:", name);
            lines.push(format!("{}{}", self.label(&format!("{:<12}", label)), value));
        }

        if let Some(updated) = &issue.updated {
            lines.push(self.dim(&format!("Updated {}", format_timestamp(updated))));
        }
        lines.push(self.dim(url));

        if let Some(description) = issue.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(String::new());
            lines.push(description.trim_end().to_string());
        }

        Ok(lines.join("\n"))
    }

    fn format_projects(&self, projects: &[Project]) -> Result<String> {
        let rows: Vec<ProjectRow> = projects
            .iter()
            .map(|project| ProjectRow {
                key: project.project_key.clone(),
                name: project.name.clone(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(table.to_string())
    }

    fn format_comments(&self, comments: &[Comment]) -> Result<String> {
        let blocks: Vec<String> = comments
            .iter()
            .map(|comment| {
                let author = comment
                    .created_user
                    .as_ref()
                    .map(|u| u.name.as_str())
                    .unwrap_or("Unknown");
                let mut lines = vec![format!(
                    "{} {}",
                    self.label(author),
                    self.dim(&format_timestamp(&comment.created))
                )];

                for change in &comment.change_log {
                    lines.push(self.dim(&format!(
                        "  {}: {} → {}",
                        change.field,
                        change.original_value.as_deref().unwrap_or("-"),
                        change.new_value.as_deref().unwrap_or("-"),
                    )));
                }

                if let Some(content) = comment.content.as_deref().filter(|c| !c.trim().is_empty()) {
                    for line in content.trim_end().lines() {
                        lines.push(format!("  {}", line));
                    }
                }

                lines.join("\n")
            })
            .collect();

        Ok(blocks.join("\n\n"))
    }
}
