use async_trait::async_trait;

use crate::domain::issue::Issue;
use crate::error::AppResult;

/// Read-only view of the issue tracker. Callers decide whether a failed
/// lookup is fatal; the workflow degrades per-issue failures to absence.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Fetch a single issue by key, including its parent reference when the
    /// parent is of the configured grouping type.
    async fn fetch_issue(&self, key: &str) -> AppResult<Issue>;

    /// List every issue whose parent is `parent_key`. The returned issues
    /// carry no parent reference of their own.
    async fn list_children(&self, parent_key: &str) -> AppResult<Vec<Issue>>;
}
