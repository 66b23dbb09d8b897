use std::collections::HashSet;

use futures::future::join_all;
use tracing::warn;

use crate::domain::issue::{Issue, ParentRef};
use crate::services::IssueTrackerService;

/// A grouping-type parent together with the fetched issues that belong to
/// it, in the order they were first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub parent: ParentRef,
    pub children: Vec<Issue>,
}

/// Aggregation result. Groups keep first-seen parent order; orphans and
/// missing children keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedIssues {
    pub groups: Vec<Group>,
    pub orphans: Vec<Issue>,
    pub missing: Vec<Issue>,
}

impl RelatedIssues {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.orphans.is_empty() && self.missing.is_empty()
    }
}

/// Partition fetched issues by parent, then consult the tracker for the
/// full child set of every parent that actually surfaced, recording any
/// child not referenced by a commit as missing.
///
/// Child lookups run concurrently; a failed lookup degrades to an empty
/// child set (logged) without affecting the other parents.
pub async fn aggregate(
    tracker: &dyn IssueTrackerService,
    issues: Vec<Issue>,
    committed_keys: &HashSet<String>,
) -> RelatedIssues {
    let mut groups: Vec<Group> = Vec::new();
    let mut orphans = Vec::new();

    for issue in issues {
        match issue.parent.clone() {
            Some(parent) => {
                match groups.iter_mut().find(|group| group.parent.key == parent.key) {
                    Some(group) => group.children.push(issue),
                    None => groups.push(Group {
                        parent,
                        children: vec![issue],
                    }),
                }
            }
            None => orphans.push(issue),
        }
    }

    let lookups = groups.iter().map(|group| {
        let parent_key = group.parent.key.clone();
        async move {
            match tracker.list_children(&parent_key).await {
                Ok(children) => children,
                Err(err) => {
                    warn!("failed to list children of {parent_key}, treating as none: {err}");
                    Vec::new()
                }
            }
        }
    });

    let mut missing = Vec::new();
    for children in join_all(lookups).await {
        for child in children {
            if !committed_keys.contains(&child.key) {
                missing.push(child);
            }
        }
    }

    RelatedIssues {
        groups,
        orphans,
        missing,
    }
}
