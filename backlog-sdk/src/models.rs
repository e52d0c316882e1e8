// ABOUTME: Typed models for Backlog API resources
// ABOUTME: Every named resource exposes its numeric ID and display name via the Resource trait

use serde::{Deserialize, Deserializer, Serialize};

/// A server-side entity identified by a numeric ID and shown by name
pub trait Resource {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

macro_rules! impl_resource {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Resource for $ty {
                fn id(&self) -> i64 {
                    self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )+
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub mail_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub project_key: String,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub release_due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl_resource!(
    ResourceReference,
    User,
    Project,
    IssueType,
    Status,
    Priority,
    Milestone,
    Category,
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: i64,
    pub project_id: i64,
    pub issue_key: String,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub issue_type: Option<IssueType>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub milestone: Vec<Milestone>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: Vec<Category>,
    #[serde(default)]
    pub created_user: Option<User>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// A field transition recorded alongside a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLog {
    pub field: String,
    #[serde(default)]
    pub original_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_user: Option<User>,
    pub created: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub change_log: Vec<ChangeLog>,
}

// Backlog sends `null` instead of `[]` for some list fields
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{mock_comments_response, mock_issue_response};

    #[test]
    fn test_issue_deserialize() {
        let issue: Issue = serde_json::from_value(mock_issue_response()).unwrap();

        assert_eq!(issue.issue_key, "PROJ-12");
        assert_eq!(issue.project_id, 1);
        assert_eq!(issue.status.as_ref().map(|s| s.name.as_str()), Some("In Progress"));
        assert_eq!(issue.assignee.as_ref().map(|u| u.id), Some(101));
        assert_eq!(issue.milestone.len(), 1);
        assert_eq!(issue.milestone[0].name, "v1.0");
        assert!(issue.category.is_empty());
    }

    #[test]
    fn test_issue_with_null_fields() {
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "id": 2,
            "projectId": 1,
            "issueKey": "PROJ-2",
            "summary": "Bare",
            "description": null,
            "assignee": null,
            "milestone": null,
            "category": null
        }))
        .unwrap();

        assert!(issue.assignee.is_none());
        assert!(issue.milestone.is_empty());
        assert!(issue.due_date.is_none());
    }

    #[test]
    fn test_comment_change_log() {
        let comments: Vec<Comment> = serde_json::from_value(mock_comments_response()).unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content.as_deref(), Some("Looks good"));
        assert!(comments[0].change_log.is_empty());
        assert_eq!(comments[1].content, None);
        assert_eq!(comments[1].change_log[0].field, "status");
        assert_eq!(comments[1].change_log[0].original_value.as_deref(), Some("Open"));
        assert_eq!(comments[1].change_log[0].new_value.as_deref(), Some("Closed"));
    }

    #[test]
    fn test_resource_trait() {
        let priority = Priority {
            id: 3,
            name: "High".to_string(),
        };
        assert_eq!(priority.id(), 3);
        assert_eq!(priority.name(), "High");
    }
}
