// src/utils/template.rs

//! Message template rendering.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").ok()).as_ref()
}

/// Fill `{name}` placeholders in a single pass.
///
/// Only placeholders written in the template are substituted; text coming
/// from `lookup` is inserted as is, even if it contains braces. Names that
/// `lookup` does not know are left untouched.
pub fn render<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let Some(pattern) = placeholder_pattern() else {
        return template.to_string();
    };
    pattern
        .replace_all(template, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
