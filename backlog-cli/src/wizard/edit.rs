// ABOUTME: Issue editing from flags or a single-field interactive wizard
// ABOUTME: Empty flag values clear clearable fields; untouched fields are never sent

use anyhow::Result;
use backlog_sdk::{BacklogClient, BacklogError, Issue, IssueUpdate, Patch, ResourceKind};

use super::{
    answer_or_cancel, optional_due_date, parse_due_date, require_interactive, resource_choices,
    Flow,
};
use crate::constants::ui::{CURRENT_MARKER, DUE_DATE_PLACEHOLDER, NO_MILESTONE, UNASSIGNED};
use crate::prompt::{choose, Choice, Echo, Prompter};

/// Field changes passed on the command line. Any of them selects flag mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOptions {
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub milestone: Option<String>,
    pub comment: Option<String>,
}

impl EditOptions {
    pub fn has_mutations(&self) -> bool {
        self.status.is_some()
            || self.assignee.is_some()
            || self.due_date.is_some()
            || self.priority.is_some()
            || self.milestone.is_some()
            || self.comment.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditField {
    Status,
    Assignee,
    DueDate,
    Priority,
    Milestone,
}

pub async fn edit_issue(
    client: &BacklogClient,
    prompter: &mut dyn Prompter,
    issue_key: &str,
    options: EditOptions,
) -> Result<Flow<Issue>> {
    let issue = client.get_issue(issue_key).await?;
    // Names resolve within the issue's own project
    let scope = issue.project_id.to_string();

    let update = if options.has_mutations() {
        from_flags(client, &scope, &options).await?
    } else {
        answer_or_cancel!(interactively(client, prompter, &issue, &scope).await?)
    };

    let updated = client.update_issue(&issue.issue_key, &update).await?;
    Ok(Flow::Completed(updated))
}

fn required_name<'a>(value: &'a Option<String>, flag: &str) -> Result<Option<&'a str>> {
    match value.as_deref().map(str::trim) {
        None => Ok(None),
        Some("") => Err(BacklogError::invalid_input(format!("{} must not be empty", flag)).into()),
        Some(name) => Ok(Some(name)),
    }
}

async fn from_flags(
    client: &BacklogClient,
    scope: &str,
    options: &EditOptions,
) -> Result<IssueUpdate> {
    let status = required_name(&options.status, "--status")?;
    let priority = required_name(&options.priority, "--priority")?;
    let due_date = match options.due_date.as_deref().map(str::trim) {
        None => Patch::Keep,
        Some("") => Patch::Clear,
        Some(date) => Patch::Set(parse_due_date(date)?),
    };

    let mut update = IssueUpdate {
        due_date,
        comment: options.comment.clone(),
        ..Default::default()
    };

    if let Some(name) = status {
        update.status_id = Patch::Set(client.resolve(ResourceKind::Status, name, scope).await?);
    }
    if let Some(name) = priority {
        update.priority_id =
            Patch::Set(client.resolve(ResourceKind::Priority, name, scope).await?);
    }

    update.assignee_id = match options.assignee.as_deref().map(str::trim) {
        None => Patch::Keep,
        Some("") => Patch::Clear,
        Some(name) => Patch::Set(client.resolve(ResourceKind::User, name, scope).await?),
    };
    update.milestone_ids = match options.milestone.as_deref().map(str::trim) {
        None => Patch::Keep,
        Some("") => Patch::Clear,
        Some(name) => Patch::Set(vec![
            client.resolve(ResourceKind::Milestone, name, scope).await?,
        ]),
    };

    Ok(update)
}

/// Edit exactly one field chosen from a menu. `None` means the user backed out.
async fn interactively(
    client: &BacklogClient,
    prompter: &mut dyn Prompter,
    issue: &Issue,
    scope: &str,
) -> Result<Option<IssueUpdate>> {
    require_interactive(prompter, "Pass the fields to change as flags instead")?;

    let menu = [
        Choice::new("Status", EditField::Status),
        Choice::new("Assignee", EditField::Assignee),
        Choice::new("Due date", EditField::DueDate),
        Choice::new("Priority", EditField::Priority),
        Choice::new("Milestone", EditField::Milestone),
    ];
    let Some(field) = choose(prompter, &format!("Edit {}", issue.issue_key), &menu)? else {
        return Ok(None);
    };

    let mut update = IssueUpdate::default();
    match field {
        EditField::Status => {
            let statuses = client.get_statuses(scope).await?;
            let current: Vec<i64> = issue.status.iter().map(|s| s.id).collect();
            let Some(id) = choose(prompter, "Status", &resource_choices(&statuses, &current))?
            else {
                return Ok(None);
            };
            update.status_id = Patch::Set(id);
        }
        EditField::Assignee => {
            let users = client.get_project_users(scope).await?;
            let current: Vec<i64> = issue.assignee.iter().map(|u| u.id).collect();
            let choices = with_sentinel(
                UNASSIGNED,
                current.is_empty(),
                &resource_choices(&users, &current),
            );
            let Some(patch) = choose(prompter, "Assignee", &choices)? else {
                return Ok(None);
            };
            update.assignee_id = patch;
        }
        EditField::DueDate => {
            let current = issue
                .due_date
                .as_deref()
                .map(|d| d.get(..10).unwrap_or(d))
                .unwrap_or("none");
            let Some(answer) = prompter.input(
                &format!("Due date (current: {}, empty to clear):", current),
                DUE_DATE_PLACEHOLDER,
                Echo::Plain,
                Some(&optional_due_date),
            )?
            else {
                return Ok(None);
            };
            update.due_date = if answer.trim().is_empty() {
                Patch::Clear
            } else {
                Patch::Set(parse_due_date(&answer)?)
            };
        }
        EditField::Priority => {
            let priorities = client.get_priorities().await?;
            let current: Vec<i64> = issue.priority.iter().map(|p| p.id).collect();
            let Some(id) = choose(prompter, "Priority", &resource_choices(&priorities, &current))?
            else {
                return Ok(None);
            };
            update.priority_id = Patch::Set(id);
        }
        EditField::Milestone => {
            let milestones = client.get_milestones(scope).await?;
            let current: Vec<i64> = issue.milestone.iter().map(|m| m.id).collect();
            let choices = with_sentinel(
                NO_MILESTONE,
                current.is_empty(),
                &resource_choices(&milestones, &current),
            );
            let Some(patch) = choose(prompter, "Milestone", &choices)? else {
                return Ok(None);
            };
            update.milestone_ids = patch.map(|id| vec![id]);
        }
    }

    if !prompter.confirm(&format!("Update {}?", issue.issue_key))? {
        return Ok(None);
    }

    Ok(Some(update))
}

/// Prepend a choice that clears the field
fn with_sentinel(
    label: &str,
    is_current: bool,
    choices: &[Choice<i64>],
) -> Vec<Choice<Patch<i64>>> {
    let mut sentinel = label.to_string();
    if is_current {
        sentinel.push_str(CURRENT_MARKER);
    }

    std::iter::once(Choice::new(sentinel, Patch::Clear))
        .chain(
            choices
                .iter()
                .map(|choice| Choice::new(choice.label.clone(), Patch::Set(choice.value))),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{EventPrompter, ScriptedKeys};
    use crate::wizard::test_support::*;
    use mockito::{Matcher, Server};

    async fn mock_lookups(server: &mut Server) {
        mock_get(server, "/issues/PROJ-12", issue()).await;
        mock_get(server, "/projects/1/statuses", statuses()).await;
        mock_get(server, "/projects/1/users", users()).await;
        mock_get(server, "/projects/1/versions", milestones()).await;
        mock_get(server, "/priorities", priorities()).await;
    }

    async fn expect_update(server: &mut Server, body: &str) -> mockito::Mock {
        server
            .mock("PATCH", "/api/v2/issues/PROJ-12")
            .match_query(Matcher::UrlEncoded("apiKey".into(), API_KEY.into()))
            .match_body(body)
            .with_status(200)
            .with_body(issue().to_string())
            .create_async()
            .await
    }

    async fn expect_no_update(server: &mut Server) -> mockito::Mock {
        server
            .mock("PATCH", "/api/v2/issues/PROJ-12")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }

    #[test]
    fn test_has_mutations() {
        assert!(!EditOptions::default().has_mutations());
        assert!(EditOptions {
            assignee: Some(String::new()),
            ..Default::default()
        }
        .has_mutations());
    }

    #[tokio::test]
    async fn test_flag_mode_sends_only_given_fields() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update = expect_update(&mut server, "comment=Done&statusId=4").await;

        let options = EditOptions {
            status: Some("Closed".to_string()),
            comment: Some("Done".to_string()),
            ..Default::default()
        };
        let mut prompter = EventPrompter::scripted(ScriptedKeys::new());
        let flow = edit_issue(&client(&server), &mut prompter, "PROJ-12", options)
            .await
            .unwrap();

        assert!(!flow.is_cancelled());
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_flag_mode_empty_values_clear() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update =
            expect_update(&mut server, "assigneeId=&dueDate=&milestoneId%5B%5D=").await;

        let options = EditOptions {
            assignee: Some(String::new()),
            due_date: Some(String::new()),
            milestone: Some(" ".to_string()),
            ..Default::default()
        };
        let mut prompter = EventPrompter::scripted(ScriptedKeys::new());
        edit_issue(&client(&server), &mut prompter, "PROJ-12", options)
            .await
            .unwrap();

        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_flag_mode_empty_status_is_rejected() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update = expect_no_update(&mut server).await;

        let options = EditOptions {
            status: Some(String::new()),
            ..Default::default()
        };
        let mut prompter = EventPrompter::scripted(ScriptedKeys::new());
        let err = edit_issue(&client(&server), &mut prompter, "PROJ-12", options)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BacklogError>(),
            Some(BacklogError::InvalidInput { .. })
        ));
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_flag_mode_unknown_status_is_not_found() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update = expect_no_update(&mut server).await;

        let options = EditOptions {
            status: Some("Done".to_string()),
            ..Default::default()
        };
        let mut prompter = EventPrompter::scripted(ScriptedKeys::new());
        let err = edit_issue(&client(&server), &mut prompter, "PROJ-12", options)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Status 'Done' not found");
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_interactive_no_milestone_sentinel_clears() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update = expect_update(&mut server, "milestoneId%5B%5D=").await;

        // Milestone menu entry, then the sentinel at the top, then confirm
        let keys = ScriptedKeys::new().down(4).enter().enter().text("y");
        let mut prompter = EventPrompter::scripted(keys);
        edit_issue(&client(&server), &mut prompter, "PROJ-12", EditOptions::default())
            .await
            .unwrap();

        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_interactive_status_change() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update = expect_update(&mut server, "statusId=3").await;

        let keys = ScriptedKeys::new().enter().line("resol").text("y");
        let mut prompter = EventPrompter::scripted(keys);
        edit_issue(&client(&server), &mut prompter, "PROJ-12", EditOptions::default())
            .await
            .unwrap();

        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_interactive_due_date_empty_clears() {
        let mut server = Server::new_async().await;
        mock_lookups(&mut server).await;
        let update = expect_update(&mut server, "dueDate=").await;

        let keys = ScriptedKeys::new().down(2).enter().enter().text("y");
        let mut prompter = EventPrompter::scripted(keys);
        edit_issue(&client(&server), &mut prompter, "PROJ-12", EditOptions::default())
            .await
            .unwrap();

        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_interactive_cancel_at_each_step() {
        let scripts = [
            ScriptedKeys::new().esc(),
            ScriptedKeys::new().enter().esc(),
            ScriptedKeys::new().enter().enter().esc(),
            ScriptedKeys::new().enter().enter().text("n"),
        ];

        for (step, keys) in scripts.into_iter().enumerate() {
            let mut server = Server::new_async().await;
            mock_lookups(&mut server).await;
            let update = expect_no_update(&mut server).await;

            let mut prompter = EventPrompter::scripted(keys);
            let flow = edit_issue(&client(&server), &mut prompter, "PROJ-12", EditOptions::default())
                .await
                .unwrap();

            assert!(flow.is_cancelled(), "step {}", step);
            update.assert_async().await;
        }
    }

    #[test]
    fn test_sentinel_marks_current_when_unset() {
        let choices = with_sentinel(UNASSIGNED, true, &[Choice::new("Alice", 101)]);
        assert_eq!(choices[0].label, "Unassigned (current)");
        assert_eq!(choices[0].value, Patch::Clear);
        assert_eq!(choices[1].value, Patch::Set(101));
    }
}
