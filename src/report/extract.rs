use std::collections::HashSet;

use regex::Regex;

use crate::error::{AppError, AppResult};

/// Collect every distinct ticket key matched by `pattern` across the given
/// commit messages. First-seen order is kept so logs stay stable, but
/// callers treat the result as a set.
pub fn extract_ticket_keys<'a, I>(messages: I, pattern: &str) -> AppResult<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let regex = Regex::new(pattern).map_err(|err| {
        AppError::Configuration(format!("invalid ticket pattern '{pattern}': {err}"))
    })?;

    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for message in messages {
        for found in regex.find_iter(message) {
            let key = found.as_str().to_string();
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}
