pub mod commit;
pub mod issue;
