use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, SourceControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub source_control: Arc<dyn SourceControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        source_control: Arc<dyn SourceControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            config,
            source_control,
            issue_tracker,
        }
    }
}
