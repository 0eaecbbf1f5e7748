//! Subscriber filter rules.

use serde::{Deserialize, Serialize};

use crate::models::Post;

/// A subscriber-defined filter.
///
/// Absent fields match every post. Present keyword lists match when any
/// keyword is a substring of the corresponding post field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    /// Recipients notified when the rule matches (never empty once validated)
    pub subscribers: Vec<String>,

    /// Exact author handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Keywords looked up in the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<String>>,

    /// Keywords looked up in the plain-text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
}

impl Rule {
    /// Check whether every present field of the rule accepts the post.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(author) = &self.author {
            if author != &post.author {
                return false;
            }
        }
        if let Some(keywords) = &self.title {
            if !contains_any(&post.title, keywords) {
                return false;
            }
        }
        if let Some(keywords) = &self.content {
            if !contains_any(&post.content, keywords) {
                return false;
            }
        }
        true
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: &str, title: &str, content: &str) -> Post {
        Post {
            post_id: "M.1.A.1".to_string(),
            title: title.to_string(),
            author: author.to_string(),
            date: " 1/02".to_string(),
            url: "https://www.ptt.cc/bbs/Test/M.1.A.1.html".to_string(),
            content: content.to_string(),
        }
    }

    fn keywords(words: &[&str]) -> Option<Vec<String>> {
        Some(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_wildcard_rule_matches_everything() {
        let rule = Rule {
            subscribers: vec!["a@example.com".into()],
            ..Rule::default()
        };
        assert!(rule.matches(&post("anyone", "anything", "")));
    }

    #[test]
    fn test_author_is_exact() {
        let rule = Rule {
            subscribers: vec!["a@example.com".into()],
            author: Some("bob".into()),
            ..Rule::default()
        };
        assert!(rule.matches(&post("bob", "t", "c")));
        assert!(!rule.matches(&post("bobby", "t", "c")));
    }

    #[test]
    fn test_title_any_keyword() {
        let rule = Rule {
            subscribers: vec!["a@example.com".into()],
            title: keywords(&["Rust", "Go"]),
            ..Rule::default()
        };
        assert!(rule.matches(&post("x", "[徵才] Go backend", "")));
        assert!(!rule.matches(&post("x", "[徵才] Java backend", "")));
    }

    #[test]
    fn test_all_present_fields_must_hold() {
        let rule = Rule {
            subscribers: vec!["a@example.com".into()],
            author: Some("bob".into()),
            title: keywords(&["Rust"]),
            content: keywords(&["remote"]),
        };
        assert!(rule.matches(&post("bob", "Rust job", "fully remote")));
        assert!(!rule.matches(&post("bob", "Rust job", "on site")));
        assert!(!rule.matches(&post("eve", "Rust job", "fully remote")));
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let rule: Rule = toml::from_str(
            r#"
            subscribers = ["a@example.com", "b@example.com"]
            title = ["Rust"]
            "#,
        )
        .unwrap();
        assert_eq!(rule.subscribers.len(), 2);
        assert_eq!(rule.author, None);
        assert_eq!(rule.title, keywords(&["Rust"]));
        assert_eq!(rule.content, None);
    }
}
