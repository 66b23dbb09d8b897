use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::{Deserialize, Serialize};

use crate::domain::commit::Commit;
use crate::error::{AppError, AppResult};
use crate::services::SourceControlService;

const API_BASE: &str = "https://api.github.com";
const AGENT: &str = concat!("jiralink/", env!("CARGO_PKG_VERSION"));

pub struct GithubClient {
    http: Client,
    token: String,
    repository: String,
}

impl GithubClient {
    pub fn new(token: String, repository: String) -> Self {
        Self {
            http: Client::new(),
            token,
            repository,
        }
    }

    fn pulls_url(&self, pr_number: u64, suffix: &str) -> String {
        format!(
            "{API_BASE}/repos/{}/pulls/{pr_number}{suffix}",
            self.repository
        )
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(AppError::SourceControl(format!(
            "GitHub responded with {status}: {body}"
        )))
    }
}

#[async_trait]
impl SourceControlService for GithubClient {
    async fn list_commits(&self, pr_number: u64) -> AppResult<Vec<Commit>> {
        let response = self
            .http
            .get(self.pulls_url(pr_number, "/commits"))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, AGENT)
            .send()
            .await
            .map_err(|err| AppError::SourceControl(format!("failed to call GitHub: {err}")))?;

        let response = Self::ensure_success(response).await?;
        let commits: Vec<GithubCommit> = response.json().await.map_err(|err| {
            AppError::SourceControl(format!("failed to parse GitHub response: {err}"))
        })?;

        Ok(commits
            .into_iter()
            .map(|commit| Commit::new(commit.sha, commit.commit.message))
            .collect())
    }

    async fn update_description(&self, pr_number: u64, body: &str) -> AppResult<()> {
        let response = self
            .http
            .patch(self.pulls_url(pr_number, ""))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, AGENT)
            .json(&UpdatePullRequest { body })
            .send()
            .await
            .map_err(|err| AppError::SourceControl(format!("failed to call GitHub: {err}")))?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct GithubCommit {
    sha: String,
    commit: GithubCommitDetail,
}

#[derive(Deserialize)]
struct GithubCommitDetail {
    message: String,
}

#[derive(Serialize)]
struct UpdatePullRequest<'a> {
    body: &'a str,
}
