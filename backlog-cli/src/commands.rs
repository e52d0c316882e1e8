// ABOUTME: Command handlers wiring parsed arguments to the Backlog client and wizards
// ABOUTME: Data goes to stdout, status and prompts go to stderr

use anyhow::{Context as _, Result};
use backlog_sdk::{BacklogClient, BacklogError, ListIssuesOptions, ResourceKind, SortOrder};
use clap::CommandFactory;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::ExposeSecret;
use std::future::Future;
use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use crate::cli::{AuthCommand, Cli, Commands, IssueCommand, JsonArgs, ProjectCommand};
use crate::cli_output::CliOutput;
use crate::completions::write_completions;
use crate::config::{Config, ConfigStore};
use crate::constants::timeouts::PROGRESS_BAR_TICK_MS;
use crate::constants::ui::CURRENT_MARKER;
use crate::git;
use crate::output::{JsonFormatter, OutputFormat, TableFormatter};
use crate::prompt::{choose, Choice, EventPrompter, Prompter};
use crate::wizard::{self, CreateOptions, EditOptions, Flow};

/// Token meaning the authenticated user in `--assignee`
const MYSELF: &str = "@me";

pub struct Context {
    store: ConfigStore,
    output: CliOutput,
    use_color: bool,
}

impl Context {
    pub fn new(store: ConfigStore, use_color: bool) -> Self {
        Self {
            store,
            output: CliOutput::with_color(use_color),
            use_color,
        }
    }

    pub fn output(&self) -> &CliOutput {
        &self.output
    }

    fn config(&self) -> Result<Config> {
        self.store.load()
    }

    fn client(&self) -> Result<BacklogClient> {
        let credential = self.config()?.require_credential()?;
        Ok(BacklogClient::new(
            &credential.space_url,
            credential.api_key.expose_secret(),
        )?)
    }

    fn formatter(&self, output: JsonArgs) -> Box<dyn OutputFormat> {
        if output.json {
            Box::new(JsonFormatter::new(output.pretty))
        } else {
            Box::new(TableFormatter::new(self.use_color))
        }
    }

    /// Await `request` behind a spinner when stderr is a terminal
    async fn fetch<T, F>(&self, message: &str, request: F) -> Result<T, BacklogError>
    where
        F: Future<Output = Result<T, BacklogError>>,
    {
        let spinner = io::stderr().is_terminal().then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message(message.to_string());
            spinner.enable_steady_tick(Duration::from_millis(PROGRESS_BAR_TICK_MS));
            spinner
        });

        let result = request.await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        result
    }

    fn project_or_default(&self, project: Option<String>) -> Result<Option<String>> {
        if let Some(project) = project.filter(|p| !p.trim().is_empty()) {
            return Ok(Some(project.trim().to_string()));
        }
        Ok(self.config()?.default_project().map(str::to_string))
    }
}

pub async fn run(ctx: &Context, command: Commands) -> Result<()> {
    let mut prompter = EventPrompter::terminal(ctx.use_color);

    match command {
        Commands::Auth(AuthCommand::Login) => auth_login(ctx, &mut prompter).await,
        Commands::Auth(AuthCommand::Logout) => auth_logout(ctx),
        Commands::Auth(AuthCommand::Status) => auth_status(ctx).await,
        Commands::Project(ProjectCommand::List { output }) => project_list(ctx, output).await,
        Commands::Project(ProjectCommand::Set { key }) => {
            project_set(ctx, &mut prompter, key).await
        }
        Commands::Project(ProjectCommand::Current) => project_current(ctx),
        Commands::Issue(command) => issue(ctx, &mut prompter, command).await,
        Commands::Completions { shell } => {
            write_completions(shell, &mut Cli::command(), &mut io::stdout());
            Ok(())
        }
    }
}

async fn issue(ctx: &Context, prompter: &mut dyn Prompter, command: IssueCommand) -> Result<()> {
    match command {
        IssueCommand::List {
            project,
            assignee,
            status,
            milestone,
            keyword,
            count,
            sort,
            order,
            output,
        } => {
            let filters = IssueFilters {
                project,
                assignee,
                status,
                milestone,
                keyword,
                count,
                sort,
                order,
            };
            issue_list(ctx, filters, output).await
        }
        IssueCommand::View { key, json } => issue_view(ctx, key, json).await,
        IssueCommand::Create {
            project,
            summary,
            issue_type,
            priority,
            assignee,
            description,
            due_date,
            milestone,
        } => {
            let options = CreateOptions {
                summary,
                issue_type,
                priority,
                assignee,
                description,
                due_date,
                milestone,
            };
            issue_create(ctx, prompter, project, options).await
        }
        IssueCommand::Edit {
            key,
            status,
            assignee,
            due_date,
            priority,
            milestone,
            comment,
        } => {
            let options = EditOptions {
                status,
                assignee,
                due_date,
                priority,
                milestone,
                comment,
            };
            issue_edit(ctx, prompter, key, options).await
        }
        IssueCommand::Comment { key, message } => issue_comment(ctx, key, message).await,
        IssueCommand::Comments {
            key,
            count,
            order,
            output,
        } => issue_comments(ctx, key, count, order, output).await,
    }
}

pub async fn auth_login(ctx: &Context, prompter: &mut dyn Prompter) -> Result<()> {
    match wizard::login(prompter, &ctx.store).await? {
        Flow::Completed(user) => {
            ctx.output.success(&format!("Logged in as {}", user.name));
        }
        Flow::Cancelled => ctx.output.cancelled(),
    }
    Ok(())
}

pub fn auth_logout(ctx: &Context) -> Result<()> {
    ctx.store.delete()?;
    ctx.output.success("Logged out");
    Ok(())
}

pub async fn auth_status(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let client = ctx.client()?;
    let user = ctx.fetch("Checking credentials", client.get_myself()).await?;

    println!("Space:   {}", client.space_url());
    println!("User:    {}", user.name);
    println!(
        "Project: {}",
        config.default_project().unwrap_or("(none)")
    );
    Ok(())
}

pub async fn project_list(ctx: &Context, output: JsonArgs) -> Result<()> {
    let client = ctx.client()?;
    let projects = ctx.fetch("Fetching projects", client.get_projects()).await?;

    if projects.is_empty() && !output.json {
        println!("No projects found.");
    } else {
        println!("{}", ctx.formatter(output).format_projects(&projects)?);
    }
    Ok(())
}

pub async fn project_set(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    key: Option<String>,
) -> Result<()> {
    let client = ctx.client()?;
    let mut config = ctx.config()?;

    let project_key = match key.filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let project = ctx
                .fetch("Checking project", client.get_project(key.trim()))
                .await?;
            project.project_key
        }
        None => {
            wizard::require_interactive(prompter, "Pass the project key: `bl project set KEY`")?;
            let projects = ctx.fetch("Fetching projects", client.get_projects()).await?;
            let current = config.default_project().map(str::to_string);
            let choices: Vec<Choice<String>> = projects
                .iter()
                .map(|project| {
                    let mut label = format!("{}  {}", project.project_key, project.name);
                    if current.as_deref() == Some(project.project_key.as_str()) {
                        label.push_str(CURRENT_MARKER);
                    }
                    Choice::new(label, project.project_key.clone())
                })
                .collect();

            match choose(prompter, "Default project", &choices)? {
                Some(key) => key,
                None => {
                    ctx.output.cancelled();
                    return Ok(());
                }
            }
        }
    };

    config.default_project = project_key.clone();
    ctx.store.save(&config)?;
    ctx.output
        .success(&format!("Default project set to {}", project_key));
    Ok(())
}

pub fn project_current(ctx: &Context) -> Result<()> {
    match ctx.config()?.default_project() {
        Some(key) => println!("{}", key),
        None => {
            ctx.output.warning("No default project set");
            ctx.output.hint("Run `bl project set` to choose one");
        }
    }
    Ok(())
}

/// Name-based filters for `bl issue list`, resolved to IDs before the request
#[derive(Debug, Clone, Default)]
pub struct IssueFilters {
    pub project: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<String>,
    pub milestone: Option<String>,
    pub keyword: Option<String>,
    pub count: u32,
    pub sort: String,
    pub order: SortOrder,
}

async fn resolve_filters(
    ctx: &Context,
    client: &BacklogClient,
    filters: IssueFilters,
) -> Result<ListIssuesOptions> {
    let mut options = ListIssuesOptions {
        keyword: filters.keyword,
        count: Some(filters.count),
        sort: Some(filters.sort),
        order: Some(filters.order.to_string()),
        ..Default::default()
    };

    let project = ctx.project_or_default(filters.project)?;
    let needs_project = filters.status.is_some()
        || filters.milestone.is_some()
        || filters.assignee.as_deref().is_some_and(|a| a != MYSELF);
    let Some(project) = project else {
        if needs_project {
            return Err(BacklogError::invalid_input(
                "Filtering by name needs a project. Pass --project or run `bl project set`",
            )
            .into());
        }
        if filters.assignee.as_deref() == Some(MYSELF) {
            options.assignee_ids = vec![client.get_myself().await?.id];
        }
        return Ok(options);
    };

    let scope = client.get_project(&project).await?;
    let scope_key = scope.project_key.as_str();
    options.project_ids = vec![scope.id];

    if let Some(assignee) = filters.assignee.as_deref() {
        let id = if assignee == MYSELF {
            client.get_myself().await?.id
        } else {
            client.resolve(ResourceKind::User, assignee, scope_key).await?
        };
        options.assignee_ids = vec![id];
    }
    if let Some(status) = filters.status.as_deref() {
        options.status_ids = vec![client.resolve(ResourceKind::Status, status, scope_key).await?];
    }
    if let Some(milestone) = filters.milestone.as_deref() {
        options.milestone_ids =
            vec![client.resolve(ResourceKind::Milestone, milestone, scope_key).await?];
    }

    Ok(options)
}

pub async fn issue_list(ctx: &Context, filters: IssueFilters, output: JsonArgs) -> Result<()> {
    let client = ctx.client()?;
    let options = resolve_filters(ctx, &client, filters).await?;
    log::debug!("Listing issues with {:?}", options);
    let issues = ctx.fetch("Fetching issues", client.list_issues(&options)).await?;

    if issues.is_empty() && !output.json {
        println!("No issues found.");
    } else {
        println!("{}", ctx.formatter(output).format_issues(&issues)?);
    }
    Ok(())
}

pub async fn issue_view(ctx: &Context, key: Option<String>, json: bool) -> Result<()> {
    let key = git::resolve_issue_key(key)?;
    let client = ctx.client()?;
    let issue = ctx.fetch("Fetching issue", client.get_issue(&key)).await?;

    let formatter = ctx.formatter(JsonArgs { json, pretty: true });
    println!(
        "{}",
        formatter.format_issue(&issue, &client.issue_url(&issue.issue_key))?
    );
    Ok(())
}

pub async fn issue_create(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    project: Option<String>,
    options: CreateOptions,
) -> Result<()> {
    let project = ctx.project_or_default(project)?.ok_or_else(|| {
        BacklogError::invalid_input("No project given. Pass --project or run `bl project set`")
    })?;
    let client = ctx.client()?;

    match wizard::create_issue(&client, prompter, &project, options).await? {
        Flow::Completed(issue) => {
            ctx.output
                .success(&format!("Created {}: {}", issue.issue_key, issue.summary));
            println!("{}", client.issue_url(&issue.issue_key));
        }
        Flow::Cancelled => ctx.output.cancelled(),
    }
    Ok(())
}

pub async fn issue_edit(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    key: Option<String>,
    options: EditOptions,
) -> Result<()> {
    let key = git::resolve_issue_key(key)?;
    let client = ctx.client()?;

    match wizard::edit_issue(&client, prompter, &key, options).await? {
        Flow::Completed(issue) => {
            ctx.output.success(&format!("Updated {}", issue.issue_key));
            println!("{}", client.issue_url(&issue.issue_key));
        }
        Flow::Cancelled => ctx.output.cancelled(),
    }
    Ok(())
}

/// Comment text from the argument, an editor on a terminal, or piped stdin
fn comment_body(message: Option<String>) -> Result<Option<String>> {
    if let Some(message) = message {
        return Ok(Some(message));
    }

    if io::stdin().is_terminal() {
        return dialoguer::Editor::new()
            .edit("")
            .context("Failed to open an editor for the comment");
    }

    let mut body = String::new();
    io::stdin()
        .read_to_string(&mut body)
        .context("Failed to read the comment from stdin")?;
    Ok(Some(body))
}

pub async fn issue_comment(ctx: &Context, key: Option<String>, message: Option<String>) -> Result<()> {
    let key = git::resolve_issue_key(key)?;
    let client = ctx.client()?;

    let Some(body) = comment_body(message)? else {
        ctx.output.cancelled();
        return Ok(());
    };

    ctx.fetch("Adding comment", client.add_comment(&key, &body))
        .await?;
    ctx.output.success(&format!("Added comment to {}", key));
    Ok(())
}

pub async fn issue_comments(
    ctx: &Context,
    key: Option<String>,
    count: u32,
    order: SortOrder,
    output: JsonArgs,
) -> Result<()> {
    let key = git::resolve_issue_key(key)?;
    let client = ctx.client()?;
    let comments = ctx
        .fetch(
            "Fetching comments",
            client.list_comments(&key, Some(count), order),
        )
        .await?;

    if comments.is_empty() && !output.json {
        println!("No comments found.");
    } else {
        println!("{}", ctx.formatter(output).format_comments(&comments)?);
    }
    Ok(())
}
