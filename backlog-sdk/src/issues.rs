// ABOUTME: Issue and comment endpoints of the Backlog API
// ABOUTME: Owns parameter encoding for issue filters, creation and partial updates

use std::fmt;
use std::str::FromStr;

use crate::constants::limits;
use crate::error::BacklogError;
use crate::models::{Comment, Issue};
use crate::patch::Patch;
use crate::transport::{path_segment, Params};
use crate::{BacklogClient, Result};

/// Clamp a requested result count into `[1, MAX_COUNT]`, treating
/// zero or unset as the default.
pub fn clamp_count(count: Option<u32>) -> u32 {
    match count {
        None | Some(0) => limits::DEFAULT_COUNT,
        Some(count) => count.min(limits::MAX_COUNT),
    }
}

/// Filters for listing issues. Empty ID lists are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListIssuesOptions {
    pub project_ids: Vec<i64>,
    pub assignee_ids: Vec<i64>,
    pub status_ids: Vec<i64>,
    pub milestone_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub keyword: Option<String>,
    pub count: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListIssuesOptions {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_all("projectId[]", &self.project_ids)
            .push_all("assigneeId[]", &self.assignee_ids)
            .push_all("statusId[]", &self.status_ids)
            .push_all("milestoneId[]", &self.milestone_ids)
            .push_all("categoryId[]", &self.category_ids)
            .push_opt("keyword", non_empty(&self.keyword))
            .push("count", clamp_count(self.count))
            .push_opt("offset", self.offset.filter(|offset| *offset > 0))
            .push_opt("sort", non_empty(&self.sort))
            .push_opt("order", non_empty(&self.order));
        params
    }
}

/// Fields for a new issue. The first four are required by the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateIssueOptions {
    pub project_id: i64,
    pub summary: String,
    pub issue_type_id: i64,
    pub priority_id: i64,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub assignee_id: Option<i64>,
    pub milestone_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
}

impl CreateIssueOptions {
    pub fn to_params(&self) -> Result<Params> {
        let summary = self.summary.trim();
        if summary.is_empty() {
            return Err(BacklogError::invalid_input("Summary must not be empty"));
        }

        let mut params = Params::new();
        params
            .push("projectId", self.project_id)
            .push("summary", summary)
            .push("issueTypeId", self.issue_type_id)
            .push("priorityId", self.priority_id)
            .push_opt("description", non_empty(&self.description))
            .push_opt("dueDate", non_empty(&self.due_date))
            .push_opt("assigneeId", self.assignee_id)
            .push_all("milestoneId[]", &self.milestone_ids)
            .push_all("categoryId[]", &self.category_ids);
        Ok(params)
    }
}

/// A sparse set of changes to an existing issue.
///
/// Only fields that are not [`Patch::Keep`] are sent. Clearing the
/// milestones sends `milestoneId[]` with an empty value, which removes
/// every milestone; keeping them sends nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueUpdate {
    pub summary: Patch<String>,
    pub issue_type_id: Patch<i64>,
    pub priority_id: Patch<i64>,
    pub status_id: Patch<i64>,
    pub assignee_id: Patch<i64>,
    pub due_date: Patch<String>,
    pub milestone_ids: Patch<Vec<i64>>,
    pub comment: Option<String>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.summary.is_keep()
            && self.issue_type_id.is_keep()
            && self.priority_id.is_keep()
            && self.status_id.is_keep()
            && self.assignee_id.is_keep()
            && self.due_date.is_keep()
            && self.milestone_ids.is_keep()
            && non_empty(&self.comment).is_none()
    }

    pub fn to_params(&self) -> Result<Params> {
        let mut params = Params::new();

        push_required(&mut params, "summary", &self.summary)?;
        push_required(&mut params, "issueTypeId", &self.issue_type_id)?;
        push_required(&mut params, "priorityId", &self.priority_id)?;
        push_required(&mut params, "statusId", &self.status_id)?;
        push_clearable(&mut params, "assigneeId", &self.assignee_id);
        push_clearable(&mut params, "dueDate", &self.due_date);

        match &self.milestone_ids {
            Patch::Keep => {}
            Patch::Set(ids) if !ids.is_empty() => {
                params.push_all("milestoneId[]", ids);
            }
            Patch::Clear | Patch::Set(_) => {
                params.push("milestoneId[]", "");
            }
        }

        params.push_opt("comment", non_empty(&self.comment));

        if params.is_empty() {
            return Err(BacklogError::invalid_input("Nothing to update"));
        }
        Ok(params)
    }
}

fn push_required<T: ToString>(params: &mut Params, key: &str, field: &Patch<T>) -> Result<()> {
    match field {
        Patch::Keep => Ok(()),
        Patch::Set(value) => {
            params.push(key, value.to_string());
            Ok(())
        }
        Patch::Clear => Err(BacklogError::invalid_input(format!(
            "{} cannot be cleared",
            key
        ))),
    }
}

fn push_clearable<T: ToString>(params: &mut Params, key: &str, field: &Patch<T>) {
    match field {
        Patch::Keep => {}
        Patch::Clear => {
            params.push(key, "");
        }
        Patch::Set(value) => {
            params.push(key, value.to_string());
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Sort order for issue and comment listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Invalid order '{}'. Must be asc or desc", other)),
        }
    }
}

impl BacklogClient {
    pub async fn list_issues(&self, options: &ListIssuesOptions) -> Result<Vec<Issue>> {
        self.get("/issues", &options.to_params()).await
    }

    /// Fetch an issue by key (`PROJ-12`) or numeric ID
    pub async fn get_issue(&self, issue: &str) -> Result<Issue> {
        let path = format!("/issues/{}", path_segment(issue)?);
        self.get(&path, &Params::new()).await
    }

    pub async fn create_issue(&self, options: &CreateIssueOptions) -> Result<Issue> {
        let params = options.to_params()?;
        self.post("/issues", &params).await
    }

    pub async fn update_issue(&self, issue: &str, update: &IssueUpdate) -> Result<Issue> {
        let params = update.to_params()?;
        let path = format!("/issues/{}", path_segment(issue)?);
        self.patch(&path, &params).await
    }

    pub async fn add_comment(&self, issue: &str, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BacklogError::invalid_input("Comment must not be empty"));
        }

        let mut params = Params::new();
        params.push("content", content);
        let path = format!("/issues/{}/comments", path_segment(issue)?);
        self.post(&path, &params).await
    }

    pub async fn list_comments(
        &self,
        issue: &str,
        count: Option<u32>,
        order: SortOrder,
    ) -> Result<Vec<Comment>> {
        let mut params = Params::new();
        params.push("count", clamp_count(count)).push("order", order);
        let path = format!("/issues/{}/comments", path_segment(issue)?);
        self.get(&path, &params).await
    }
}
