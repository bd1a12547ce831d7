//! Parameter substitution for command lines
//!
//! Replaces `${name}` with bound parameter values. Anything that is not a
//! parameter of the recipe is left untouched so the shell can expand it.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

/// Substitute parameter values into a command line.
///
/// Values are inserted verbatim and are not scanned again.
pub fn substitute<'a>(line: &'a str, params: &IndexMap<String, String>) -> Cow<'a, str> {
    if params.is_empty() {
        return Cow::Borrowed(line);
    }

    placeholder().replace_all(line, |caps: &Captures| match params.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
}
