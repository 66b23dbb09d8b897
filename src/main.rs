mod config;
mod context;
mod domain;
mod error;
mod infra;
mod report;
mod services;
mod workflow;

use std::sync::Arc;

use clap::Parser;

use crate::config::{AppConfig, Inputs};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::github::GithubClient;
use crate::infra::jira::JiraClient;
use crate::workflow::annotate::{AnnotateOutcome, annotate_pull_request};

/// Annotate a pull request with a summary of the Jira issues referenced by
/// its commit messages. Intended to run inside a pull-request CI job; every
/// flag can also come from the environment.
#[derive(Parser)]
#[command(name = "jiralink", author, version, about)]
struct Cli {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
    /// Repository in owner/repo form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: Option<String>,
    /// Number of the pull request to annotate.
    #[arg(long, env = "PR_NUMBER")]
    pr_number: Option<u64>,
    #[arg(long, env = "JIRA_BASE_URL")]
    jira_base_url: Option<String>,
    #[arg(long, env = "JIRA_EMAIL")]
    jira_email: Option<String>,
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_api_token: Option<String>,
    /// Regex matching ticket keys in commit messages.
    #[arg(long, env = "TICKET_REGEX")]
    ticket_regex: Option<String>,
    /// Issue type whose instances act as grouping parents.
    #[arg(long, env = "GROUPING_ISSUE_TYPE")]
    grouping_issue_type: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_inputs(Inputs {
        github_token: cli.github_token,
        repository: cli.repository,
        event_name: cli.event_name,
        pr_number: cli.pr_number,
        jira_base_url: cli.jira_base_url,
        jira_email: cli.jira_email,
        jira_api_token: cli.jira_api_token,
        ticket_pattern: cli.ticket_regex,
        grouping_issue_type: cli.grouping_issue_type,
    })?;

    let source_control = Arc::new(GithubClient::new(
        config.github_token.clone(),
        config.repository.clone(),
    ));
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_api_token.clone(),
        config.grouping_issue_type.clone(),
    ));

    let context = AppContext::new(config, source_control, issue_tracker);

    match annotate_pull_request(&context).await? {
        AnnotateOutcome::NoTickets => {
            println!("No ticket keys found in commit messages; description left unchanged.");
        }
        AnnotateOutcome::Updated {
            groups,
            orphans,
            missing,
        } => {
            println!(
                "Pull request description updated: {groups} group(s), {orphans} other issue(s), {missing} missing child(ren)."
            );
        }
    }

    Ok(())
}
