// ABOUTME: Resolves human-readable resource names to numeric IDs
// ABOUTME: Matching is exact and case-sensitive; the first match in server order wins

use std::fmt;

use crate::error::BacklogError;
use crate::models::Resource;
use crate::{BacklogClient, Result};

/// The kinds of named resources that can be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    IssueType,
    Priority,
    Status,
    User,
    Milestone,
    Category,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Project => "Project",
            ResourceKind::IssueType => "Issue type",
            ResourceKind::Priority => "Priority",
            ResourceKind::Status => "Status",
            ResourceKind::User => "User",
            ResourceKind::Milestone => "Milestone",
            ResourceKind::Category => "Category",
        };
        write!(f, "{}", label)
    }
}

/// Find the ID of the first resource whose name equals `name` exactly.
///
/// Duplicate names are legal on the server; callers get the first one
/// in the order the server returned them.
pub fn find_id<R: Resource>(kind: ResourceKind, resources: &[R], name: &str) -> Result<i64> {
    resources
        .iter()
        .find(|resource| resource.name() == name)
        .map(|resource| resource.id())
        .ok_or_else(|| BacklogError::NotFound {
            kind,
            name: name.to_string(),
        })
}

impl BacklogClient {
    /// Fetch the list for `kind` and resolve `name` against it.
    ///
    /// `project` is a project key or ID and scopes every kind except
    /// priorities. Projects resolve by key or by display name.
    pub async fn resolve(&self, kind: ResourceKind, name: &str, project: &str) -> Result<i64> {
        tracing::debug!(%kind, name, project, "resolving name");

        match kind {
            ResourceKind::Project => {
                let projects = self.get_projects().await?;
                projects
                    .iter()
                    .find(|p| p.project_key == name)
                    .map(|p| p.id)
                    .map_or_else(|| find_id(kind, &projects, name), Ok)
            }
            ResourceKind::IssueType => find_id(kind, &self.get_issue_types(project).await?, name),
            ResourceKind::Priority => find_id(kind, &self.get_priorities().await?, name),
            ResourceKind::Status => find_id(kind, &self.get_statuses(project).await?, name),
            ResourceKind::User => find_id(kind, &self.get_project_users(project).await?, name),
            ResourceKind::Milestone => find_id(kind, &self.get_milestones(project).await?, name),
            ResourceKind::Category => find_id(kind, &self.get_categories(project).await?, name),
        }
    }
}
