use std::collections::HashSet;

use futures::future::join_all;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::issue::Issue;
use crate::error::AppResult;
use crate::report::{aggregate, extract_ticket_keys, render_report};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotateOutcome {
    /// No ticket keys in any commit message; the description was left alone.
    NoTickets,
    /// The description was replaced with the rendered report.
    Updated {
        groups: usize,
        orphans: usize,
        missing: usize,
    },
}

/// Single pass: list the pull request's commits, extract ticket keys, fetch
/// issue metadata concurrently, aggregate, render, and replace the pull
/// request description. No retries; fatal errors bubble up to the caller.
pub async fn annotate_pull_request(ctx: &AppContext) -> AppResult<AnnotateOutcome> {
    let pr_number = ctx.config.pr_number;

    let commits = ctx.source_control.list_commits(pr_number).await?;
    let keys = extract_ticket_keys(
        commits.iter().map(|commit| commit.message.as_str()),
        &ctx.config.ticket_pattern,
    )?;

    if keys.is_empty() {
        info!("no ticket keys found in {} commits, nothing to do", commits.len());
        return Ok(AnnotateOutcome::NoTickets);
    }

    let committed_keys: HashSet<String> = keys.iter().cloned().collect();

    // Fetch every referenced issue at once; a failed fetch drops that key
    // from the working set instead of failing the run.
    let fetches = keys.iter().map(|key| {
        let tracker = ctx.issue_tracker.clone();
        async move {
            match tracker.fetch_issue(key).await {
                Ok(issue) => Some(issue),
                Err(err) => {
                    warn!("skipping {key}: {err}");
                    None
                }
            }
        }
    });
    let issues: Vec<Issue> = join_all(fetches).await.into_iter().flatten().collect();

    let related = aggregate(ctx.issue_tracker.as_ref(), issues, &committed_keys).await;
    let body = render_report(&ctx.config.jira_base_url, &related);

    ctx.source_control
        .update_description(pr_number, &body)
        .await?;

    Ok(AnnotateOutcome::Updated {
        groups: related.groups.len(),
        orphans: related.orphans.len(),
        missing: related.missing.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{AppConfig, Inputs};
    use crate::domain::commit::Commit;
    use crate::error::AppError;
    use crate::services::{IssueTrackerService, SourceControlService};

    struct FakeSourceControl {
        commits: Vec<Commit>,
        updates: Mutex<Vec<String>>,
    }

    impl FakeSourceControl {
        fn new(messages: &[&str]) -> Self {
            Self {
                commits: messages
                    .iter()
                    .enumerate()
                    .map(|(i, message)| Commit::new(format!("sha{i}"), *message))
                    .collect(),
                updates: Mutex::new(Vec::new()),
            }
        }

        fn updates(&self) -> Vec<String> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SourceControlService for FakeSourceControl {
        async fn list_commits(&self, _pr_number: u64) -> AppResult<Vec<Commit>> {
            Ok(self.commits.clone())
        }

        async fn update_description(&self, _pr_number: u64, body: &str) -> AppResult<()> {
            self.updates.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeTracker {
        issues: HashMap<String, Issue>,
        children: HashMap<String, Vec<Issue>>,
        fetches: Mutex<Vec<String>>,
    }

    impl FakeTracker {
        fn with_issue(mut self, issue: Issue) -> Self {
            self.issues.insert(issue.key.clone(), issue);
            self
        }

        fn with_children(mut self, parent: &str, children: Vec<Issue>) -> Self {
            self.children.insert(parent.to_string(), children);
            self
        }

        fn fetched_keys(&self) -> Vec<String> {
            self.fetches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IssueTrackerService for FakeTracker {
        async fn fetch_issue(&self, key: &str) -> AppResult<Issue> {
            self.fetches.lock().unwrap().push(key.to_string());
            self.issues
                .get(key)
                .cloned()
                .ok_or_else(|| AppError::IssueTracker(format!("Jira responded with 404 for {key}")))
        }

        async fn list_children(&self, parent_key: &str) -> AppResult<Vec<Issue>> {
            Ok(self.children.get(parent_key).cloned().unwrap_or_default())
        }
    }

    fn test_context(
        source_control: Arc<FakeSourceControl>,
        tracker: Arc<FakeTracker>,
    ) -> AppContext {
        let config = AppConfig::from_inputs(Inputs {
            github_token: Some("token".to_string()),
            repository: Some("acme/widgets".to_string()),
            event_name: Some("pull_request".to_string()),
            pr_number: Some(7),
            jira_base_url: Some("https://acme.atlassian.net".to_string()),
            jira_email: Some("bot@acme.dev".to_string()),
            jira_api_token: Some("secret".to_string()),
            ticket_pattern: Some("RC-[^ ]*".to_string()),
            grouping_issue_type: None,
        })
        .expect("test config");
        AppContext::new(config, source_control, tracker)
    }

    #[tokio::test]
    async fn no_tickets_short_circuits_without_tracker_calls() {
        let source_control = Arc::new(FakeSourceControl::new(&["chore: bump deps"]));
        let tracker = Arc::new(FakeTracker::default());
        let ctx = test_context(source_control.clone(), tracker.clone());

        let outcome = annotate_pull_request(&ctx).await.expect("run");

        assert_eq!(outcome, AnnotateOutcome::NoTickets);
        assert!(tracker.fetched_keys().is_empty());
        assert!(source_control.updates().is_empty());
    }

    #[tokio::test]
    async fn full_run_groups_and_updates_description() {
        let source_control = Arc::new(FakeSourceControl::new(&["RC-1 fix", "RC-2 also RC-1"]));
        let tracker = Arc::new(
            FakeTracker::default()
                .with_issue(Issue::new("RC-1", "Task", "fix login").with_parent(
                    "RC-10",
                    "Login epic",
                ))
                .with_issue(Issue::new("RC-2", "Bug", "standalone bug"))
                .with_children(
                    "RC-10",
                    vec![
                        Issue::new("RC-1", "Task", "fix login"),
                        Issue::new("RC-3", "Task", "forgotten sibling"),
                    ],
                ),
        );
        let ctx = test_context(source_control.clone(), tracker.clone());

        let outcome = annotate_pull_request(&ctx).await.expect("run");

        assert_eq!(
            outcome,
            AnnotateOutcome::Updated {
                groups: 1,
                orphans: 1,
                missing: 1,
            }
        );
        let updates = source_control.updates();
        assert_eq!(updates.len(), 1);
        let body = &updates[0];
        assert!(body.starts_with("### Related Jira Issues"));
        assert!(body.contains("[RC-10](https://acme.atlassian.net/browse/RC-10) Login epic"));
        assert!(body.contains("- **Bug**: [RC-2]"));
        assert!(body.contains("- **Task**: [RC-3]"));
    }

    #[tokio::test]
    async fn failed_issue_fetch_is_excluded_not_fatal() {
        let source_control = Arc::new(FakeSourceControl::new(&["RC-5 broken", "RC-2 ok"]));
        let tracker =
            Arc::new(FakeTracker::default().with_issue(Issue::new("RC-2", "Bug", "standalone")));
        let ctx = test_context(source_control.clone(), tracker.clone());

        let outcome = annotate_pull_request(&ctx).await.expect("run");

        assert_eq!(
            outcome,
            AnnotateOutcome::Updated {
                groups: 0,
                orphans: 1,
                missing: 0,
            }
        );
        assert!(!source_control.updates()[0].contains("RC-5"));
    }

    #[tokio::test]
    async fn all_fetches_failing_still_writes_header_only_report() {
        let source_control = Arc::new(FakeSourceControl::new(&["RC-1 and RC-2"]));
        let tracker = Arc::new(FakeTracker::default());
        let ctx = test_context(source_control.clone(), tracker.clone());

        let outcome = annotate_pull_request(&ctx).await.expect("run");

        assert_eq!(
            outcome,
            AnnotateOutcome::Updated {
                groups: 0,
                orphans: 0,
                missing: 0,
            }
        );
        assert_eq!(source_control.updates(), vec!["### Related Jira Issues"]);
    }

    #[tokio::test]
    async fn duplicate_keys_are_fetched_once() {
        let source_control = Arc::new(FakeSourceControl::new(&["RC-1 fix", "RC-1 again"]));
        let tracker =
            Arc::new(FakeTracker::default().with_issue(Issue::new("RC-1", "Task", "fix")));
        let ctx = test_context(source_control.clone(), tracker.clone());

        annotate_pull_request(&ctx).await.expect("run");

        assert_eq!(tracker.fetched_keys(), vec!["RC-1"]);
    }
}
