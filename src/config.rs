use crate::error::{AppError, AppResult};

pub const DEFAULT_TICKET_PATTERN: &str = r"RC-[^ \[\]]*";
pub const DEFAULT_GROUPING_ISSUE_TYPE: &str = "Story";

/// Raw key/value inputs as handed over by the CI environment (or CLI
/// flags). Everything is optional here; `AppConfig::from_inputs` decides
/// what is required.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub github_token: Option<String>,
    pub repository: Option<String>,
    pub event_name: Option<String>,
    pub pr_number: Option<u64>,
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub ticket_pattern: Option<String>,
    pub grouping_issue_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: String,
    pub repository: String,
    pub pr_number: u64,
    pub jira_base_url: String,
    pub jira_email: String,
    pub jira_api_token: String,
    pub ticket_pattern: String,
    pub grouping_issue_type: String,
}

impl AppConfig {
    pub fn from_inputs(inputs: Inputs) -> AppResult<Self> {
        let event_name = inputs.event_name.unwrap_or_default();
        if event_name != "pull_request" && event_name != "pull_request_target" {
            return Err(AppError::Configuration(format!(
                "this tool only runs on pull request events, got '{event_name}'"
            )));
        }

        let pr_number = inputs.pr_number.ok_or_else(|| {
            AppError::Configuration("pull request number not provided".to_string())
        })?;

        let repository = required(inputs.repository, "repository (owner/repo)")?;
        if repository.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(AppError::Configuration(format!(
                "repository must be in 'owner/repo' form, got '{repository}'"
            )));
        }

        Ok(Self {
            github_token: required(inputs.github_token, "GitHub token")?,
            repository,
            pr_number,
            jira_base_url: required(inputs.jira_base_url, "Jira base URL")?
                .trim_end_matches('/')
                .to_string(),
            jira_email: required(inputs.jira_email, "Jira email")?,
            jira_api_token: required(inputs.jira_api_token, "Jira API token")?,
            ticket_pattern: inputs
                .ticket_pattern
                .filter(|pattern| !pattern.is_empty())
                .unwrap_or_else(|| DEFAULT_TICKET_PATTERN.to_string()),
            grouping_issue_type: inputs
                .grouping_issue_type
                .filter(|kind| !kind.is_empty())
                .unwrap_or_else(|| DEFAULT_GROUPING_ISSUE_TYPE.to_string()),
        })
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{field} not configured")))
}
