use crate::domain::issue::Issue;
use crate::report::aggregate::RelatedIssues;

const REPORT_HEADER: &str = "### Related Jira Issues";
const ORPHANS_HEADER: &str = "#### Other Issues";
const MISSING_HEADER: &str = "#### Missing Child Issues";
const MISSING_INTRO: &str =
    "The following issues share a parent with issues in this pull request \
     but were not referenced by any commit message:";

/// Render the aggregated issues as the Markdown body for the pull request
/// description. Pure and deterministic; sections without entries are
/// omitted entirely.
pub fn render_report(base_url: &str, related: &RelatedIssues) -> String {
    let mut blocks = vec![REPORT_HEADER.to_string()];

    for group in &related.groups {
        let mut block = format!(
            "{} {}",
            link(base_url, &group.parent.key),
            group.parent.title
        );
        for child in &group.children {
            block.push('\n');
            block.push_str(&bullet(base_url, child));
        }
        blocks.push(block);
    }

    if !related.orphans.is_empty() {
        let mut block = ORPHANS_HEADER.to_string();
        for orphan in &related.orphans {
            block.push('\n');
            block.push_str(&bullet(base_url, orphan));
        }
        blocks.push(block);
    }

    if !related.missing.is_empty() {
        let mut block = format!("{MISSING_HEADER}\n{MISSING_INTRO}");
        for child in &related.missing {
            block.push('\n');
            block.push_str(&bullet(base_url, child));
        }
        blocks.push(block);
    }

    blocks.join("\n\n")
}

fn link(base_url: &str, key: &str) -> String {
    format!("[{key}]({}/browse/{key})", base_url.trim_end_matches('/'))
}

fn bullet(base_url: &str, issue: &Issue) -> String {
    format!(
        "- **{}**: {} {}",
        issue.kind,
        link(base_url, &issue.key),
        issue.title
    )
}
