pub mod issue_tracker;
pub mod source_control;

pub use issue_tracker::IssueTrackerService;
pub use source_control::SourceControlService;
