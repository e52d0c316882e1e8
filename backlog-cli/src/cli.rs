// ABOUTME: CLI argument definitions for the bl command-line client
// ABOUTME: Defines the command-line interface structure using clap derive macros

use backlog_sdk::SortOrder;
use clap::{Args, Parser, Subcommand};

use crate::completions::{Shell, INSTALLATION_INSTRUCTIONS};

#[derive(Parser, Debug)]
#[command(name = "bl")]
#[command(about = "A CLI for Backlog", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Force colored output even when piped
    #[arg(long, global = true, conflicts_with = "no_color")]
    pub force_color: bool,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the stored credential
    #[command(subcommand)]
    Auth(AuthCommand),
    /// List projects and choose the default one
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Work with issues
    #[command(subcommand)]
    Issue(IssueCommand),
    /// Generate shell completions
    #[command(after_long_help = INSTALLATION_INSTRUCTIONS)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Log in with a space URL and API key
    Login,
    /// Remove the stored credential
    Logout,
    /// Show who you are logged in as
    Status,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Pretty print JSON output
    #[arg(long, requires = "json")]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List projects you can access
    List {
        #[command(flatten)]
        output: JsonArgs,
    },
    /// Set the default project (choose from a list when KEY is omitted)
    Set {
        /// Project key (e.g., PROJ)
        key: Option<String>,
    },
    /// Show the default project
    Current,
}

#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// List issues
    List {
        /// Project key (defaults to the configured project)
        #[arg(short, long)]
        project: Option<String>,

        /// Filter by assignee name (use "@me" for yourself)
        #[arg(short, long)]
        assignee: Option<String>,

        /// Filter by status name
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by milestone name
        #[arg(short, long)]
        milestone: Option<String>,

        /// Filter by keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// Maximum number of issues to fetch (1-100)
        #[arg(short, long, default_value = "20")]
        count: u32,

        /// Field to sort by
        #[arg(long, default_value = "updated")]
        sort: String,

        /// Sort order (asc or desc)
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        #[command(flatten)]
        output: JsonArgs,
    },
    /// Show details for a single issue
    View {
        /// Issue key (e.g., PROJ-12); taken from the git branch when omitted
        key: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new issue (prompts for every field when --summary is omitted)
    Create {
        /// Project key (defaults to the configured project)
        #[arg(short, long)]
        project: Option<String>,

        /// Issue summary
        #[arg(short, long)]
        summary: Option<String>,

        /// Issue type name
        #[arg(short = 't', long = "type", requires = "summary")]
        issue_type: Option<String>,

        /// Priority name
        #[arg(long, requires = "summary")]
        priority: Option<String>,

        /// Assignee name
        #[arg(short, long, requires = "summary")]
        assignee: Option<String>,

        /// Issue description
        #[arg(short, long, requires = "summary")]
        description: Option<String>,

        /// Due date (yyyy-MM-dd)
        #[arg(long, requires = "summary")]
        due_date: Option<String>,

        /// Milestone name
        #[arg(short, long, requires = "summary")]
        milestone: Option<String>,
    },
    /// Change fields of an issue (prompts for one field when no flag is given)
    Edit {
        /// Issue key (e.g., PROJ-12); taken from the git branch when omitted
        key: Option<String>,

        /// New status name
        #[arg(long)]
        status: Option<String>,

        /// New assignee name (empty to unassign)
        #[arg(short, long)]
        assignee: Option<String>,

        /// New due date (yyyy-MM-dd, empty to clear)
        #[arg(long)]
        due_date: Option<String>,

        /// New priority name
        #[arg(long)]
        priority: Option<String>,

        /// New milestone name (empty to clear)
        #[arg(short, long)]
        milestone: Option<String>,

        /// Comment to add with the change
        #[arg(long)]
        comment: Option<String>,
    },
    /// Add a comment to an issue
    Comment {
        /// Issue key (e.g., PROJ-12); taken from the git branch when omitted
        key: Option<String>,

        /// Comment text (opens an editor or reads stdin when omitted)
        message: Option<String>,
    },
    /// Show comments for an issue
    Comments {
        /// Issue key (e.g., PROJ-12); taken from the git branch when omitted
        key: Option<String>,

        /// Maximum number of comments to fetch (1-100)
        #[arg(short, long, default_value = "20")]
        count: u32,

        /// Sort order (asc or desc)
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        #[command(flatten)]
        output: JsonArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "bl");
    }

    #[test]
    fn test_issue_list_defaults() {
        let cli = Cli::try_parse_from(["bl", "issue", "list"]).unwrap();
        match cli.command {
            Commands::Issue(IssueCommand::List {
                count,
                sort,
                order,
                output,
                ..
            }) => {
                assert_eq!(count, 20);
                assert_eq!(sort, "updated");
                assert_eq!(order, SortOrder::Desc);
                assert!(!output.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_issue_list_filters() {
        let cli = Cli::try_parse_from([
            "bl", "issue", "list", "-p", "PROJ", "-a", "@me", "-s", "Open", "-m", "v1.0", "-k",
            "crash", "-c", "500", "--order", "asc",
        ])
        .unwrap();
        match cli.command {
            Commands::Issue(IssueCommand::List {
                project,
                assignee,
                status,
                milestone,
                keyword,
                count,
                order,
                ..
            }) => {
                assert_eq!(project.as_deref(), Some("PROJ"));
                assert_eq!(assignee.as_deref(), Some("@me"));
                assert_eq!(status.as_deref(), Some("Open"));
                assert_eq!(milestone.as_deref(), Some("v1.0"));
                assert_eq!(keyword.as_deref(), Some("crash"));
                // Clamped by the client, not by the parser
                assert_eq!(count, 500);
                assert_eq!(order, SortOrder::Asc);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_pretty_requires_json() {
        assert!(Cli::try_parse_from(["bl", "project", "list", "--pretty"]).is_err());
        assert!(Cli::try_parse_from(["bl", "project", "list", "--json", "--pretty"]).is_ok());
    }

    #[test]
    fn test_create_fields_require_summary() {
        assert!(Cli::try_parse_from(["bl", "issue", "create", "-t", "Bug"]).is_err());
        assert!(Cli::try_parse_from(["bl", "issue", "create", "--priority", "High"]).is_err());

        let cli = Cli::try_parse_from([
            "bl", "issue", "create", "-s", "Bug", "-t", "Bug", "--priority", "High",
        ])
        .unwrap();
        match cli.command {
            Commands::Issue(IssueCommand::Create {
                summary,
                issue_type,
                priority,
                assignee,
                ..
            }) => {
                assert_eq!(summary.as_deref(), Some("Bug"));
                assert_eq!(issue_type.as_deref(), Some("Bug"));
                assert_eq!(priority.as_deref(), Some("High"));
                assert_eq!(assignee, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_edit_accepts_empty_values() {
        let cli =
            Cli::try_parse_from(["bl", "issue", "edit", "PROJ-12", "--assignee", "", "-m", ""])
                .unwrap();
        match cli.command {
            Commands::Issue(IssueCommand::Edit {
                key,
                assignee,
                milestone,
                status,
                ..
            }) => {
                assert_eq!(key.as_deref(), Some("PROJ-12"));
                assert_eq!(assignee.as_deref(), Some(""));
                assert_eq!(milestone.as_deref(), Some(""));
                assert_eq!(status, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_order_is_rejected() {
        assert!(Cli::try_parse_from(["bl", "issue", "comments", "--order", "sideways"]).is_err());
    }

    #[test]
    fn test_comments_and_list_share_sort_order() {
        let cli = Cli::try_parse_from(["bl", "issue", "comments", "PROJ-12", "--order", "ASC"])
            .unwrap();
        match cli.command {
            Commands::Issue(IssueCommand::Comments { key, order, .. }) => {
                assert_eq!(key.as_deref(), Some("PROJ-12"));
                assert_eq!(order, SortOrder::Asc);
            }
            other => panic!("Expected issue comments, got {:?}", other),
        }

        assert!(Cli::try_parse_from(["bl", "issue", "list", "--order", "sideways"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["bl", "auth", "status", "--no-color", "-v"]).unwrap();
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Auth(AuthCommand::Status)));

        assert!(Cli::try_parse_from(["bl", "--no-color", "--force-color", "auth", "status"]).is_err());
    }
}
