// ABOUTME: Centralized constants for the bl command-line client
// ABOUTME: Contains config locations, prompt layout, date formats and status name mappings

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Where the configuration record lives
pub mod config {
    /// Environment variable overriding the config file path
    pub const CONFIG_PATH_ENV: &str = "BL_CONFIG";

    pub const CONFIG_DIR: &str = "bl";
    pub const CONFIG_FILE: &str = "config.yaml";
}

pub mod timeouts {
    /// Spinner tick interval for smooth animation
    pub const PROGRESS_BAR_TICK_MS: u64 = 80;
}

/// Prompt and table layout
pub mod ui {
    /// Maximum rows a list prompt shows at once
    pub const SELECT_WINDOW: usize = 10;

    /// Summary column width in issue tables
    pub const SUMMARY_WIDTH: usize = 50;

    pub const SPACE_URL_PLACEHOLDER: &str = "https://myteam.backlog.com";
    pub const DUE_DATE_PLACEHOLDER: &str = "2025-12-31";

    /// Appended to the label of the value an issue currently has
    pub const CURRENT_MARKER: &str = " (current)";

    pub const UNASSIGNED: &str = "Unassigned";
    pub const NO_MILESTONE: &str = "No milestone";
}

pub mod dates {
    /// Due dates are entered and sent as `yyyy-MM-dd`
    pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

    pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
}

/// Environment variables that indicate a CI runner
pub const CI_ENV_VARS: &[&str] = &["CI", "GITHUB_ACTIONS", "JENKINS_URL", "BUILDKITE"];

/// Default Backlog status names
pub mod status {
    pub const OPEN: &str = "Open";
    pub const IN_PROGRESS: &str = "In Progress";
    pub const RESOLVED: &str = "Resolved";
    pub const CLOSED: &str = "Closed";
}

/// Status names as spaces show them, in English and Japanese, keyed in lowercase
pub static STATUS_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("open", status::OPEN);
    m.insert("未対応", status::OPEN);
    m.insert("in progress", status::IN_PROGRESS);
    m.insert("処理中", status::IN_PROGRESS);
    m.insert("resolved", status::RESOLVED);
    m.insert("処理済み", status::RESOLVED);
    m.insert("closed", status::CLOSED);
    m.insert("完了", status::CLOSED);
    m
});
