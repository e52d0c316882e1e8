// ABOUTME: Git helpers for inferring the issue being worked on
// ABOUTME: Extracts a Backlog issue key from the current branch name

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Command;

static ISSUE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z][A-Z0-9_]+-\d+").unwrap());

pub fn current_branch() -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        return Err(anyhow!("Not inside a git repository"));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// First issue key in a branch name (`feature/PROJ-12-login` gives `PROJ-12`)
pub fn extract_issue_key(branch: &str) -> Option<&str> {
    ISSUE_KEY.find(branch).map(|m| m.as_str())
}

/// Use the explicit key when given, otherwise the one in the current branch
pub fn resolve_issue_key(explicit: Option<String>) -> Result<String> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    let missing = || anyhow!("Pass an issue key or switch to a branch whose name contains one");
    let branch = current_branch().map_err(|_| missing())?;
    log::debug!("Looking for an issue key in branch '{}'", branch);

    extract_issue_key(&branch)
        .map(str::to_string)
        .ok_or_else(missing)
}
