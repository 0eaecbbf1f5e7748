//! Rule matching.

use crate::models::{Post, Rule};

/// Subscribers of every rule the post satisfies, in rule order.
///
/// Rules are independent: a post matching several rules collects the
/// subscribers of each, duplicates included.
pub fn match_subscribers<'a>(
    post: &'a Post,
    rules: &'a [Rule],
) -> impl Iterator<Item = &'a str> + 'a {
    rules
        .iter()
        .filter(move |rule| rule.matches(post))
        .flat_map(|rule| rule.subscribers.iter().map(String::as_str))
}
