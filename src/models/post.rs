//! Post and raw listing entry data structures.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::utils::template::render;
use crate::utils::url::extract_post_id;

/// A post fetched from a board.
///
/// Identity is the `post_id` alone; two posts with the same id compare equal
/// even if their titles were edited between scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Identifier taken from the post's canonical URL
    pub post_id: String,

    /// Post title
    pub title: String,

    /// Author handle
    pub author: String,

    /// Free-form date as shown on the listing
    pub date: String,

    /// Absolute URL of the post
    pub url: String,

    /// Plain-text body
    pub content: String,
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.post_id == other.post_id
    }
}

impl Eq for Post {}

impl Hash for Post {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.post_id.hash(state);
    }
}

impl Post {
    /// Value of a template placeholder, if `name` is a post field.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "author" => Some(&self.author),
            "date" => Some(&self.date),
            "url" => Some(&self.url),
            "id" => Some(&self.post_id),
            "content" => Some(&self.content),
            _ => None,
        }
    }

    /// Format post for display using a template.
    ///
    /// Supported placeholders:
    /// - `{title}`, `{author}`, `{date}`, `{url}`, `{content}`, `{id}`
    pub fn format(&self, template: &str) -> String {
        render(template, |name| self.field(name).map(str::to_string))
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}\n{}\n{}", self.date, self.author, self.title, self.url)
    }
}

/// One row of a listing page, before the post behind it is fetched.
///
/// Fields are `None` when the row lacks them, which is how deleted posts
/// show up on the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPost {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Absolute link to the post page
    pub url: Option<String>,
}

impl RawPost {
    /// Identifier the post would get once built, if the row links anywhere.
    pub fn post_id(&self) -> Option<String> {
        self.url.as_deref().and_then(extract_post_id)
    }
}

/// An element of a listing page in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    Post(RawPost),
    /// Divider between the chronological stream and the sticky posts below it
    StickySeparator,
}

/// A single fetched listing page.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Entries oldest at the top to newest at the bottom, stickies last
    pub entries: Vec<ListingEntry>,

    /// Link to the next older page, if any
    pub next_url: Option<String>,
}
