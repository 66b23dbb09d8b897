use async_trait::async_trait;

use crate::domain::commit::Commit;
use crate::error::AppResult;

#[async_trait]
pub trait SourceControlService: Send + Sync {
    async fn list_commits(&self, pr_number: u64) -> AppResult<Vec<Commit>>;
    async fn update_description(&self, pr_number: u64, body: &str) -> AppResult<()>;
}
