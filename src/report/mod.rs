pub mod aggregate;
pub mod extract;
pub mod render;

pub use aggregate::{Group, RelatedIssues, aggregate};
pub use extract::extract_ticket_keys;
pub use render::render_report;
