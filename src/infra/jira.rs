use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;

use crate::domain::issue::{Issue, ParentRef};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    token: String,
    grouping_issue_type: String,
}

impl JiraClient {
    pub fn new(base_url: String, email: String, token: String, grouping_issue_type: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            token,
            grouping_issue_type,
        }
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.email, self.token);
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        response.json::<T>().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn fetch_issue(&self, key: &str) -> AppResult<Issue> {
        let url = format!("{}/rest/api/3/issue/{key}", self.base_url);
        let payload: JiraIssue = self
            .get_json(url, &[("fields", "issuetype,summary,parent")])
            .await?;
        Ok(payload.into_issue(&self.grouping_issue_type))
    }

    async fn list_children(&self, parent_key: &str) -> AppResult<Vec<Issue>> {
        let url = format!("{}/rest/api/3/search", self.base_url);
        let jql = format!("parent={parent_key}");
        let payload: JiraSearchResults = self
            .get_json(url, &[("jql", jql.as_str()), ("fields", "issuetype,summary")])
            .await?;
        Ok(payload
            .issues
            .into_iter()
            .map(|issue| issue.into_issue(&self.grouping_issue_type))
            .collect())
    }
}

/// Wire shape of a Jira issue with the fields this tool requests. Missing
/// `issuetype` or `summary` fails deserialization, which the fetch phase
/// treats as a degraded per-issue failure.
#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    issuetype: JiraIssueType,
    summary: String,
    #[serde(default)]
    parent: Option<JiraParent>,
}

#[derive(Deserialize)]
struct JiraIssueType {
    name: String,
}

#[derive(Deserialize)]
struct JiraParent {
    key: String,
    fields: JiraParentFields,
}

#[derive(Deserialize)]
struct JiraParentFields {
    issuetype: JiraIssueType,
    summary: String,
}

#[derive(Deserialize)]
struct JiraSearchResults {
    issues: Vec<JiraIssue>,
}

impl JiraIssue {
    /// Only a parent of the grouping type survives the conversion; any
    /// other parent makes the issue an orphan as far as grouping goes.
    fn into_issue(self, grouping_issue_type: &str) -> Issue {
        let parent = self
            .fields
            .parent
            .filter(|parent| parent.fields.issuetype.name == grouping_issue_type)
            .map(|parent| ParentRef {
                key: parent.key,
                title: parent.fields.summary,
            });
        Issue {
            key: self.key,
            kind: self.fields.issuetype.name,
            title: self.fields.summary,
            parent,
        }
    }
}
