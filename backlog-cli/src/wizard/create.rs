// ABOUTME: Issue creation from flags or an interactive wizard
// ABOUTME: Names given on the command line are resolved to IDs; prompts offer server-side lists

use anyhow::Result;
use backlog_sdk::{
    BacklogClient, BacklogError, CreateIssueOptions, Issue, Project, ResourceKind,
};

use super::{
    answer_or_cancel, non_empty, optional_due_date, parse_due_date, require_interactive,
    resource_choices, Flow,
};
use crate::constants::ui::{DUE_DATE_PLACEHOLDER, UNASSIGNED};
use crate::prompt::{choose, Choice, Echo, Prompter};

/// What the user passed on the command line. A summary selects flag mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    pub summary: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub milestone: Option<String>,
}

pub async fn create_issue(
    client: &BacklogClient,
    prompter: &mut dyn Prompter,
    project_key: &str,
    options: CreateOptions,
) -> Result<Flow<Issue>> {
    if options.summary.is_none() && (options.issue_type.is_some() || options.priority.is_some()) {
        return Err(BacklogError::invalid_input("--type and --priority require --summary").into());
    }

    let project = client.get_project(project_key).await?;

    let request = match options.summary.as_deref() {
        Some(summary) => from_flags(client, &project, summary, &options).await?,
        None => answer_or_cancel!(interactively(client, prompter, &project).await?),
    };

    log::debug!(
        "Creating issue in project {} with type {} and priority {}",
        project.project_key,
        request.issue_type_id,
        request.priority_id
    );
    let issue = client.create_issue(&request).await?;
    Ok(Flow::Completed(issue))
}

async fn from_flags(
    client: &BacklogClient,
    project: &Project,
    summary: &str,
    options: &CreateOptions,
) -> Result<CreateIssueOptions> {
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(BacklogError::invalid_input("Summary must not be empty").into());
    }

    let (Some(type_name), Some(priority_name)) =
        (non_empty(&options.issue_type), non_empty(&options.priority))
    else {
        return Err(
            BacklogError::invalid_input("--type and --priority are required with --summary")
                .into(),
        );
    };

    let due_date = non_empty(&options.due_date)
        .map(parse_due_date)
        .transpose()?;

    let scope = project.project_key.as_str();
    let issue_type_id = client
        .resolve(ResourceKind::IssueType, type_name, scope)
        .await?;
    let priority_id = client
        .resolve(ResourceKind::Priority, priority_name, scope)
        .await?;

    let assignee_id = match non_empty(&options.assignee) {
        Some(name) => Some(client.resolve(ResourceKind::User, name, scope).await?),
        None => None,
    };
    let milestone_ids = match non_empty(&options.milestone) {
        Some(name) => vec![client.resolve(ResourceKind::Milestone, name, scope).await?],
        None => Vec::new(),
    };

    Ok(CreateIssueOptions {
        project_id: project.id,
        summary: summary.to_string(),
        issue_type_id,
        priority_id,
        description: non_empty(&options.description).map(str::to_string),
        due_date,
        assignee_id,
        milestone_ids,
        category_ids: Vec::new(),
    })
}

/// Prompt order: summary, type, priority, assignee, due date, description, confirm.
/// `None` means the user backed out.
async fn interactively(
    client: &BacklogClient,
    prompter: &mut dyn Prompter,
    project: &Project,
) -> Result<Option<CreateIssueOptions>> {
    require_interactive(prompter, "Pass --summary, --type and --priority instead")?;
    let scope = project.project_key.as_str();

    let not_empty = |value: &str| {
        if value.trim().is_empty() {
            Err("Summary must not be empty".to_string())
        } else {
            Ok(())
        }
    };
    let Some(summary) = prompter.input(
        "Summary:",
        "What needs to be done?",
        Echo::Plain,
        Some(&not_empty),
    )?
    else {
        return Ok(None);
    };

    let issue_types = client.get_issue_types(scope).await?;
    if issue_types.is_empty() {
        return Err(BacklogError::invalid_input(format!(
            "Project {} has no issue types",
            scope
        ))
        .into());
    }
    let Some(issue_type_id) = choose(prompter, "Issue type", &resource_choices(&issue_types, &[]))?
    else {
        return Ok(None);
    };

    let priorities = client.get_priorities().await?;
    let Some(priority_id) = choose(prompter, "Priority", &resource_choices(&priorities, &[]))?
    else {
        return Ok(None);
    };

    let users = client.get_project_users(scope).await?;
    let mut assignees = vec![Choice::new(UNASSIGNED, None)];
    assignees.extend(
        resource_choices(&users, &[])
            .into_iter()
            .map(|choice| Choice::new(choice.label, Some(choice.value))),
    );
    let Some(assignee_id) = choose(prompter, "Assignee", &assignees)? else {
        return Ok(None);
    };

    let Some(due_date) = prompter.input(
        "Due date (yyyy-MM-dd, empty to skip):",
        DUE_DATE_PLACEHOLDER,
        Echo::Plain,
        Some(&optional_due_date),
    )?
    else {
        return Ok(None);
    };
    let due_date = Some(due_date)
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_due_date(&d))
        .transpose()?;

    let Some(description) =
        prompter.input("Description (empty to skip):", "", Echo::Plain, None)?
    else {
        return Ok(None);
    };

    if !prompter.confirm("Create this issue?")? {
        return Ok(None);
    }

    Ok(Some(CreateIssueOptions {
        project_id: project.id,
        summary: summary.trim().to_string(),
        issue_type_id,
        priority_id,
        description: Some(description.trim().to_string()).filter(|d| !d.is_empty()),
        due_date,
        assignee_id,
        milestone_ids: Vec::new(),
        category_ids: Vec::new(),
    }))
}
